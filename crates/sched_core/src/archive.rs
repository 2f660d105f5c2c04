use crate::date;
use crate::model::Task;
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Split tasks into the active view and the archive.
///
/// A task stays active while incomplete, or while its completion falls on
/// the current or previous calendar day relative to `now`. The window is
/// measured on date components only, so work completed late in the
/// evening still counts as "today" the next morning. A completed task
/// with a missing or unreadable completion stamp stays active rather
/// than silently disappearing into the archive.
pub fn partition(tasks: &[Task], now: OffsetDateTime) -> (Vec<Task>, Vec<Task>) {
    let today = now.date();
    let mut active = Vec::new();
    let mut archived = Vec::new();

    for task in tasks {
        if is_active(task, now, today) {
            active.push(task.clone());
        } else {
            archived.push(task.clone());
        }
    }

    archived.sort_by_key(|task| std::cmp::Reverse(completion_timestamp(task)));

    (active, archived)
}

fn is_active(task: &Task, now: OffsetDateTime, today: time::Date) -> bool {
    if !task.completed {
        return true;
    }

    let completed_at = match task.completion_date.as_deref() {
        Some(value) => value,
        None => return true,
    };

    match OffsetDateTime::parse(completed_at, &Rfc3339) {
        Ok(parsed) => {
            let completed_day = parsed.to_offset(now.offset()).date();
            date::days_between(completed_day, today) < 1
        }
        Err(_) => true,
    }
}

fn completion_timestamp(task: &Task) -> i128 {
    task.completion_date
        .as_deref()
        .and_then(|value| OffsetDateTime::parse(value, &Rfc3339).ok())
        .map(|parsed| parsed.unix_timestamp_nanos())
        .unwrap_or(i128::MIN)
}

/// Case-insensitive name-substring filter; a blank term passes everything.
pub fn filter_by_name(tasks: &[Task], term: &str) -> Vec<Task> {
    let needle = term.trim().to_lowercase();
    if needle.is_empty() {
        return tasks.to_vec();
    }

    tasks
        .iter()
        .filter(|task| task.name.to_lowercase().contains(&needle))
        .cloned()
        .collect()
}
