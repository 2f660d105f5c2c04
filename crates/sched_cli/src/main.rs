use clap::{CommandFactory, Parser};
use sched_cli::cli::{AssigneeCommand, Cli, Command, parse_priority, parse_view_mode};
use sched_core::error::AppError;
use sched_core::model::{Task, TaskDraft};
use sched_core::organize::Group;
use sched_core::repo::TaskRepository;
use sched_core::storage::FileStore;
use sched_core::{advisor, archive, calendar, config, date, organize};
use std::io::{self, BufRead};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct TaskRow {
    id: String,
    name: String,
    assignee: String,
    deadline: String,
    priority: &'static str,
    status: String,
}

impl TaskRow {
    fn from_task(task: &Task) -> Self {
        let status = if task.completed {
            "completed".to_string()
        } else if task.enable_reminders {
            "pending".to_string()
        } else {
            "pending (no reminders)".to_string()
        };
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            assignee: task.assignee.clone(),
            deadline: task.deadline.clone(),
            priority: task.priority.label(),
            status,
        }
    }
}

#[derive(Tabled)]
struct ArchiveRow {
    id: String,
    name: String,
    assignee: String,
    deadline: String,
    completed_at: String,
}

impl ArchiveRow {
    fn from_task(task: &Task) -> Self {
        Self {
            id: task.id.clone(),
            name: task.name.clone(),
            assignee: task.assignee.clone(),
            deadline: task.deadline.clone(),
            completed_at: task.completion_date.clone().unwrap_or_else(|| "-".to_string()),
        }
    }
}

fn print_task_table(tasks: &[Task]) {
    let rows: Vec<TaskRow> = tasks.iter().map(TaskRow::from_task).collect();
    println!("{}", Table::new(rows));
}

fn print_groups_plain(groups: &[Group]) {
    for group in groups {
        println!("== {}", group.label);
        print_task_table(&group.tasks);
    }
}

fn print_groups_json(groups: &[Group]) -> Result<(), AppError> {
    let mut payload = Vec::with_capacity(groups.len());
    for group in groups {
        payload.push(serde_json::json!({
            "key": group.key,
            "label": group.label,
            "tasks": tasks_json(&group.tasks)?,
        }));
    }
    println!("{}", serde_json::Value::Array(payload));
    Ok(())
}

fn tasks_json(tasks: &[Task]) -> Result<serde_json::Value, AppError> {
    serde_json::to_value(tasks).map_err(|err| AppError::invalid_data(err.to_string()))
}

fn print_task_json(task: &Task) -> Result<(), AppError> {
    let json = serde_json::to_value(task).map_err(|err| AppError::invalid_data(err.to_string()))?;
    println!("{json}");
    Ok(())
}

fn open_repo(config: &config::Config) -> Result<TaskRepository, AppError> {
    let store = FileStore::from_env()?;
    TaskRepository::open(Box::new(store), config)
}

fn normalize_parse_error(err: clap::Error) -> AppError {
    let rendered = err.to_string();
    let first_line = rendered.lines().next().unwrap_or("invalid command").trim();
    let message = first_line
        .strip_prefix("error: ")
        .unwrap_or(first_line)
        .to_string();
    AppError::invalid_input(message)
}

fn split_command_line(line: &str) -> Result<Vec<String>, AppError> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut escape = false;

    for ch in line.chars() {
        if escape {
            if ch != '"' && ch != '\\' {
                current.push('\\');
            }
            current.push(ch);
            escape = false;
            continue;
        }

        if in_quotes && ch == '\\' {
            escape = true;
            continue;
        }

        if ch == '"' {
            in_quotes = !in_quotes;
            continue;
        }

        if ch.is_whitespace() && !in_quotes {
            if !current.is_empty() {
                args.push(current.clone());
                current.clear();
            }
            continue;
        }

        current.push(ch);
    }

    if in_quotes {
        return Err(AppError::invalid_input("unterminated quote in command"));
    }

    if !current.is_empty() {
        args.push(current);
    }

    Ok(args)
}

fn print_help() {
    let mut cmd = Cli::command();
    let help = cmd.render_help();
    println!("{help}");
}

fn run_command(cli: Cli) -> Result<(), AppError> {
    let config_load = config::load_config_with_fallback();
    if let Some(err) = &config_load.error {
        eprintln!("WARNING: {err}");
    }
    let mut repo = open_repo(&config_load.config)?;

    match cli.command {
        Command::Add {
            name,
            assignee,
            deadline,
            priority,
            notes,
        } => {
            let priority = parse_priority(&priority).map_err(AppError::invalid_input)?;
            let draft = TaskDraft {
                name,
                assignee,
                deadline,
                priority,
                notes,
            };
            let task = repo.create(&draft)?;
            if cli.json {
                print_task_json(&task)?;
            } else {
                println!("Added task: {} ({})", task.name, task.id);
            }
        }
        Command::Edit {
            id,
            name,
            assignee,
            deadline,
            priority,
            notes,
        } => {
            let priority = parse_priority(&priority).map_err(AppError::invalid_input)?;
            let draft = TaskDraft {
                name,
                assignee,
                deadline,
                priority,
                notes,
            };
            match repo.update(&id, &draft)? {
                Some(task) => {
                    if cli.json {
                        print_task_json(&task)?;
                    } else {
                        println!("Updated task: {} ({})", task.name, task.id);
                    }
                }
                None => println!("No matching task: {id}"),
            }
        }
        Command::Done { id } => match repo.set_completed(&id, true)? {
            Some(task) => {
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!("Completed task: {} ({})", task.name, task.id);
                }
            }
            None => println!("No matching task: {id}"),
        },
        Command::Reopen { id } => match repo.set_completed(&id, false)? {
            Some(task) => {
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!("Reopened task: {} ({})", task.name, task.id);
                }
            }
            None => println!("No matching task: {id}"),
        },
        Command::Remind { id, off } => match repo.set_reminder(&id, !off)? {
            Some(task) => {
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    // Reports the state after the toggle, never before.
                    let state = if task.enable_reminders {
                        "enabled"
                    } else {
                        "disabled"
                    };
                    println!("Reminders {} for task: {} ({})", state, task.name, task.id);
                }
            }
            None => println!("No matching task: {id}"),
        },
        Command::Delete { id } => match repo.delete(&id)? {
            Some(task) => {
                if cli.json {
                    print_task_json(&task)?;
                } else {
                    println!("Deleted task: {} ({})", task.name, task.id);
                }
            }
            None => println!("No matching task: {id}"),
        },
        Command::List { by, search } => {
            let view = parse_view_mode(&by).map_err(AppError::invalid_input)?;
            let (active, _) = archive::partition(repo.tasks(), date::now_local());
            let visible = archive::filter_by_name(&active, search.as_deref().unwrap_or(""));
            let groups = organize::organize(&visible, view);
            if cli.json {
                print_groups_json(&groups)?;
            } else if groups.is_empty() {
                println!("아직 등록된 업무가 없습니다.");
            } else {
                print_groups_plain(&groups);
            }
        }
        Command::Archive { search } => {
            let (_, archived) = archive::partition(repo.tasks(), date::now_local());
            let visible = archive::filter_by_name(&archived, search.as_deref().unwrap_or(""));
            if cli.json {
                println!("{}", tasks_json(&visible)?);
            } else if visible.is_empty() {
                println!("No archived tasks.");
            } else {
                let rows: Vec<ArchiveRow> = visible.iter().map(ArchiveRow::from_task).collect();
                println!("{}", Table::new(rows));
            }
        }
        Command::Calendar => {
            let index = calendar::aggregate_by_date(repo.tasks());
            if cli.json {
                let json = serde_json::to_value(&index)
                    .map_err(|err| AppError::invalid_data(err.to_string()))?;
                println!("{json}");
            } else {
                for (deadline, assignees) in &index {
                    let label = match date::parse_local_date(deadline) {
                        Ok(parsed) => date::date_label(parsed),
                        Err(_) => deadline.clone(),
                    };
                    println!("{label}: {}", assignees.join(", "));
                }
            }
        }
        Command::Day { date, assignee } => {
            let tasks = calendar::tasks_for(repo.tasks(), &date, &assignee);
            if cli.json {
                println!("{}", tasks_json(&tasks)?);
            } else if tasks.is_empty() {
                println!("No tasks for {assignee} on {date}.");
            } else {
                print_task_table(&tasks);
            }
        }
        Command::BatchDone { date, assignee } => {
            let affected = repo.batch_complete(&date, &assignee)?;
            if cli.json {
                println!("{}", serde_json::json!({ "completed": affected }));
            } else {
                println!("Completed {affected} task(s) for {assignee} on {date}");
            }
        }
        Command::Assignee { assignee } => match assignee {
            AssigneeCommand::Add { name } => {
                repo.add_assignee(&name)?;
                println!("Added assignee: {name}");
            }
            AssigneeCommand::Remove { name } => {
                repo.remove_assignee(&name)?;
                println!("Removed assignee: {name}");
            }
            AssigneeCommand::List => {
                if cli.json {
                    let json = serde_json::to_value(repo.assignees())
                        .map_err(|err| AppError::invalid_data(err.to_string()))?;
                    println!("{json}");
                } else {
                    for name in repo.assignees() {
                        println!("{name}");
                    }
                }
            }
        },
        Command::Suggest => {
            let advisor = advisor::advisor_from_env(&config_load.config);
            let suggestion = advisor::suggest(repo.tasks(), advisor.as_ref());
            println!("{suggestion}");
        }
    }

    Ok(())
}

fn run_interactive() -> Result<(), AppError> {
    let mut input = String::new();
    let stdin = io::stdin();
    let mut stdin_lock = stdin.lock();

    loop {
        input.clear();
        let bytes = stdin_lock
            .read_line(&mut input)
            .map_err(|err| AppError::io(err.to_string()))?;

        if bytes == 0 {
            break;
        }

        let line = input.trim();
        if line.is_empty() {
            continue;
        }

        if line.eq_ignore_ascii_case("exit") || line.eq_ignore_ascii_case("quit") {
            break;
        }

        if line == "help" || line == "?" {
            print_help();
            continue;
        }

        let args = match split_command_line(line) {
            Ok(args) => args,
            Err(err) => {
                eprintln!("ERROR: {err}");
                continue;
            }
        };

        if args.is_empty() {
            continue;
        }

        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push("schedmate".to_string());
        argv.extend(args);

        let cli = match Cli::try_parse_from(argv) {
            Ok(cli) => cli,
            Err(err) => {
                eprintln!("ERROR: {}", normalize_parse_error(err));
                continue;
            }
        };

        if let Err(err) = run_command(cli) {
            eprintln!("ERROR: {err}");
        }
    }

    Ok(())
}

fn main() {
    let mut args = std::env::args_os();
    args.next();
    if args.next().is_none() {
        if let Err(err) = run_interactive() {
            eprintln!("ERROR: {err}");
            std::process::exit(1);
        }
        return;
    }

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            eprintln!("ERROR: {}", normalize_parse_error(err));
            std::process::exit(1);
        }
    };

    if let Err(err) = run_command(cli) {
        eprintln!("ERROR: {err}");
        std::process::exit(1);
    }
}
