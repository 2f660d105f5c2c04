use clap::{Parser, Subcommand};
use sched_core::model::Priority;
use sched_core::organize::ViewMode;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: schedmate add "주간 보고서" --assignee 최준원 --deadline 2025-03-10 --priority high
    Add {
        name: String,
        #[arg(long)]
        assignee: String,
        /// Deadline in YYYY-MM-DD
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Edit a task's details
    ///
    /// Example: schedmate edit task-1 "주간 보고서 v2" --assignee 백옥주 --deadline 2025-03-12 --priority low
    Edit {
        id: String,
        name: String,
        #[arg(long)]
        assignee: String,
        #[arg(long)]
        deadline: String,
        #[arg(long, default_value = "medium")]
        priority: String,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Mark a task as completed
    ///
    /// Example: schedmate done task-1
    Done {
        id: String,
    },
    /// Reopen a completed task
    ///
    /// Example: schedmate reopen task-1
    Reopen {
        id: String,
    },
    /// Turn reminders on or off for a task
    ///
    /// Example: schedmate remind task-1
    /// Example: schedmate remind task-1 --off
    Remind {
        id: String,
        #[arg(long)]
        off: bool,
    },
    /// Delete a task
    ///
    /// Example: schedmate delete task-1
    Delete {
        id: String,
    },
    /// List active tasks, grouped
    ///
    /// Example: schedmate list
    /// Example: schedmate list --by deadline --search 보고서
    List {
        /// Grouping dimension: assignee, deadline or priority
        #[arg(long, default_value = "assignee")]
        by: String,
        /// Case-insensitive name filter
        #[arg(long)]
        search: Option<String>,
    },
    /// List archived tasks (completed more than a day ago)
    ///
    /// Example: schedmate archive
    Archive {
        #[arg(long)]
        search: Option<String>,
    },
    /// Show which assignees have deadlines on which dates
    ///
    /// Example: schedmate calendar
    Calendar,
    /// Show every task for one date and assignee
    ///
    /// Example: schedmate day 2025-03-10 최준원
    Day {
        date: String,
        assignee: String,
    },
    /// Complete every open task for one date and assignee
    ///
    /// Example: schedmate batch-done 2025-03-10 최준원
    BatchDone {
        date: String,
        assignee: String,
    },
    /// Manage the assignee roster
    Assignee {
        #[command(subcommand)]
        assignee: AssigneeCommand,
    },
    /// Ask the AI advisor for a schedule suggestion
    ///
    /// Example: schedmate suggest
    Suggest,
}

#[derive(Subcommand, Debug)]
pub enum AssigneeCommand {
    /// Add a name to the roster
    Add {
        name: String,
    },
    /// Remove a name from the roster (blocked while the name has open tasks)
    Remove {
        name: String,
    },
    /// List the roster
    List,
}

pub fn parse_view_mode(raw: &str) -> Result<ViewMode, String> {
    match raw.trim() {
        "assignee" => Ok(ViewMode::ByAssignee),
        "deadline" => Ok(ViewMode::ByDeadline),
        "priority" => Ok(ViewMode::ByPriority),
        other => Err(format!(
            "unknown grouping '{other}' (expected assignee, deadline or priority)"
        )),
    }
}

pub fn parse_priority(raw: &str) -> Result<Priority, String> {
    Priority::parse(raw)
        .ok_or_else(|| format!("unknown priority '{raw}' (expected high, medium or low)"))
}
