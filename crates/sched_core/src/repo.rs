use crate::calendar;
use crate::config::Config;
use crate::error::AppError;
use crate::model::{Task, TaskDraft};
use crate::storage::{ASSIGNEES_KEY, StoragePort, TASKS_KEY};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

/// Canonical owner of the task and assignee collections. All mutation
/// goes through here; every mutating operation rewrites the affected
/// snapshot through the injected storage port as its last step.
pub struct TaskRepository {
    store: Box<dyn StoragePort>,
    tasks: Vec<Task>,
    assignees: Vec<String>,
}

impl TaskRepository {
    /// Load both snapshots. Missing or corrupt data degrades to an empty
    /// task list and the configured default roster; load never fails on
    /// bad content, only on an unreadable store.
    pub fn open(store: Box<dyn StoragePort>, config: &Config) -> Result<Self, AppError> {
        let tasks = match store.read_snapshot(TASKS_KEY)? {
            Some(content) => serde_json::from_str::<Vec<Task>>(&content).unwrap_or_default(),
            None => Vec::new(),
        };

        let assignees = match store.read_snapshot(ASSIGNEES_KEY)? {
            Some(content) => serde_json::from_str::<Vec<String>>(&content)
                .unwrap_or_else(|_| config.default_assignees.clone()),
            None => config.default_assignees.clone(),
        };

        Ok(Self {
            store,
            tasks,
            assignees,
        })
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn assignees(&self) -> &[String] {
        &self.assignees
    }

    pub fn find(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Create a task from a validated draft and prepend it; the newest
    /// task is always first in canonical order.
    pub fn create(&mut self, draft: &TaskDraft) -> Result<Task, AppError> {
        let draft = validate_draft(draft)?;
        if !self.assignees.contains(&draft.assignee) {
            return Err(AppError::invalid_input("unknown assignee"));
        }

        let task = Task {
            id: format!("task-{}", OffsetDateTime::now_utc().unix_timestamp_nanos()),
            name: draft.name,
            assignee: draft.assignee,
            deadline: draft.deadline,
            priority: draft.priority,
            completed: false,
            completion_date: None,
            enable_reminders: true,
            notes: draft.notes,
        };

        self.tasks.insert(0, task.clone());
        self.save_tasks()?;

        Ok(task)
    }

    /// Replace the draft-covered fields of an existing task. Returns
    /// `Ok(None)` without persisting when the id is unknown.
    pub fn update(&mut self, id: &str, draft: &TaskDraft) -> Result<Option<Task>, AppError> {
        let draft = validate_draft(draft)?;

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.name = draft.name;
        task.assignee = draft.assignee;
        task.deadline = draft.deadline;
        task.priority = draft.priority;
        task.notes = draft.notes;
        let updated = task.clone();

        self.save_tasks()?;
        Ok(Some(updated))
    }

    /// Set the completion flag. The false-to-true transition stamps the
    /// completion date; the reverse clears it. Setting the flag to its
    /// current value is a no-op and never re-stamps.
    pub fn set_completed(&mut self, id: &str, value: bool) -> Result<Option<Task>, AppError> {
        let stamp = now_stamp()?;

        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        if task.completed == value {
            return Ok(Some(task.clone()));
        }

        task.completed = value;
        task.completion_date = value.then_some(stamp);
        let updated = task.clone();

        self.save_tasks()?;
        Ok(Some(updated))
    }

    pub fn set_reminder(&mut self, id: &str, value: bool) -> Result<Option<Task>, AppError> {
        let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) else {
            return Ok(None);
        };

        task.enable_reminders = value;
        let updated = task.clone();

        self.save_tasks()?;
        Ok(Some(updated))
    }

    pub fn delete(&mut self, id: &str) -> Result<Option<Task>, AppError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(None);
        };

        let removed = self.tasks.remove(index);
        self.save_tasks()?;
        Ok(Some(removed))
    }

    /// Complete every open task for a calendar date and assignee in one
    /// step; returns the number of tasks changed (0 is a reportable
    /// no-op, not an error).
    pub fn batch_complete(&mut self, date: &str, assignee: &str) -> Result<usize, AppError> {
        let stamp = now_stamp()?;
        let (updated, affected) = calendar::batch_complete(&self.tasks, date, assignee, &stamp);

        if affected > 0 {
            self.tasks = updated;
            self.save_tasks()?;
        }

        Ok(affected)
    }

    pub fn add_assignee(&mut self, name: &str) -> Result<(), AppError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(AppError::invalid_input("assignee name is required"));
        }
        if self.assignees.iter().any(|existing| existing == trimmed) {
            return Err(AppError::invalid_input("assignee already exists"));
        }

        self.assignees.push(trimmed.to_string());
        self.save_assignees()
    }

    /// Removal is blocked while the assignee still owns open work;
    /// completed tasks keep their (now dangling) assignee string.
    pub fn remove_assignee(&mut self, name: &str) -> Result<(), AppError> {
        let blocked = self
            .tasks
            .iter()
            .any(|task| task.assignee == name && !task.completed);
        if blocked {
            return Err(AppError::invalid_input("assignee has incomplete tasks"));
        }

        self.assignees.retain(|existing| existing != name);
        self.save_assignees()
    }

    fn save_tasks(&self) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(&self.tasks)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        self.store.write_snapshot(TASKS_KEY, &content)
    }

    fn save_assignees(&self) -> Result<(), AppError> {
        let content = serde_json::to_string_pretty(&self.assignees)
            .map_err(|err| AppError::invalid_data(err.to_string()))?;
        self.store.write_snapshot(ASSIGNEES_KEY, &content)
    }
}

fn validate_draft(draft: &TaskDraft) -> Result<TaskDraft, AppError> {
    let name = draft.name.trim();
    if name.is_empty() {
        return Err(AppError::invalid_input("name is required"));
    }

    let assignee = draft.assignee.trim();
    if assignee.is_empty() {
        return Err(AppError::invalid_input("assignee is required"));
    }

    crate::date::parse_local_date(&draft.deadline)?;

    Ok(TaskDraft {
        name: name.to_string(),
        assignee: assignee.to_string(),
        deadline: draft.deadline.trim().to_string(),
        priority: draft.priority,
        notes: draft.notes.clone(),
    })
}

fn now_stamp() -> Result<String, AppError> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|err| AppError::invalid_data(err.to_string()))
}
