use crate::date;
use crate::model::{Priority, Task, UNASSIGNED_LABEL};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    ByAssignee,
    ByDeadline,
    ByPriority,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub key: String,
    pub label: String,
    pub tasks: Vec<Task>,
}

/// Derive the grouped-and-sorted view for one grouping dimension.
///
/// Completed tasks surface first within every group (the stable pre-sort
/// the UI always applied), then a view-specific tie-break. Recomputed on
/// every call; the collections are small enough that indices would be
/// wasted complexity.
pub fn organize(tasks: &[Task], view: ViewMode) -> Vec<Group> {
    let mut ordered: Vec<Task> = tasks.to_vec();
    ordered.sort_by_key(|task| !task.completed);

    match view {
        ViewMode::ByAssignee => {
            let mut groups: BTreeMap<String, Vec<Task>> = BTreeMap::new();
            for task in ordered {
                let key = assignee_key(&task);
                groups.entry(key).or_default().push(task);
            }

            groups
                .into_iter()
                .map(|(key, mut tasks)| {
                    tasks.sort_by(|a, b| {
                        (!a.completed, a.deadline.as_str())
                            .cmp(&(!b.completed, b.deadline.as_str()))
                    });
                    Group {
                        label: key.clone(),
                        key,
                        tasks,
                    }
                })
                .collect()
        }
        ViewMode::ByDeadline => {
            // YYYY-MM-DD sorts chronologically as a plain string.
            let mut groups: BTreeMap<String, Vec<Task>> = BTreeMap::new();
            for task in ordered {
                groups.entry(task.deadline.clone()).or_default().push(task);
            }

            groups
                .into_iter()
                .map(|(key, mut tasks)| {
                    tasks.sort_by(|a, b| {
                        (!a.completed, a.priority.rank(), a.assignee.as_str())
                            .cmp(&(!b.completed, b.priority.rank(), b.assignee.as_str()))
                    });
                    Group {
                        label: deadline_label(&key),
                        key,
                        tasks,
                    }
                })
                .collect()
        }
        ViewMode::ByPriority => [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .filter_map(|priority| {
                let mut tasks: Vec<Task> = ordered
                    .iter()
                    .filter(|task| task.priority == priority)
                    .cloned()
                    .collect();
                if tasks.is_empty() {
                    return None;
                }
                tasks.sort_by(|a, b| {
                    (!a.completed, a.deadline.as_str(), a.assignee.as_str())
                        .cmp(&(!b.completed, b.deadline.as_str(), b.assignee.as_str()))
                });
                Some(Group {
                    key: priority.as_str().to_string(),
                    label: priority.label().to_string(),
                    tasks,
                })
            })
            .collect(),
    }
}

fn assignee_key(task: &Task) -> String {
    if task.assignee.trim().is_empty() {
        UNASSIGNED_LABEL.to_string()
    } else {
        task.assignee.clone()
    }
}

fn deadline_label(deadline: &str) -> String {
    match date::parse_local_date(deadline) {
        Ok(parsed) => date::date_label(parsed),
        Err(_) => deadline.to_string(),
    }
}
