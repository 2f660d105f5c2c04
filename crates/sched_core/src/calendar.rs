use crate::model::Task;
use std::collections::BTreeMap;

/// Per-deadline-date index of distinct assignees, first-seen order kept
/// within each date. Only incomplete tasks contribute; the index exists
/// to drive calendar badges and batch completion, both of which only
/// care about open work.
pub fn aggregate_by_date(tasks: &[Task]) -> BTreeMap<String, Vec<String>> {
    let mut index: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for task in tasks {
        if task.completed {
            continue;
        }
        let assignees = index.entry(task.deadline.clone()).or_default();
        if !assignees.contains(&task.assignee) {
            assignees.push(task.assignee.clone());
        }
    }

    index
}

/// Every task on the given date for the given assignee, completed ones
/// included; callers need the full set to decide "all complete" state.
pub fn tasks_for(tasks: &[Task], date: &str, assignee: &str) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.deadline == date && task.assignee == assignee)
        .cloned()
        .collect()
}

/// Complete every open task matching the date/assignee pair, stamping
/// the given completion timestamp. Zero matches is a valid no-op.
pub fn batch_complete(
    tasks: &[Task],
    date: &str,
    assignee: &str,
    completed_at: &str,
) -> (Vec<Task>, usize) {
    let mut updated = tasks.to_vec();
    let mut affected = 0;

    for task in &mut updated {
        if task.deadline == date && task.assignee == assignee && !task.completed {
            task.completed = true;
            task.completion_date = Some(completed_at.to_string());
            affected += 1;
        }
    }

    (updated, affected)
}
