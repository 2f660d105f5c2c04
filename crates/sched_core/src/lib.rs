pub mod advisor;
pub mod archive;
pub mod calendar;
pub mod config;
pub mod date;
pub mod error;
pub mod model;
pub mod organize;
pub mod repo;
pub mod storage;

#[cfg(test)]
mod tests {
    use crate::error::AppError;
    use crate::model::{Priority, Task};

    #[test]
    fn task_has_required_fields() {
        let task = Task {
            id: "task-1".to_string(),
            name: "demo".to_string(),
            assignee: "Kim".to_string(),
            deadline: "2025-03-10".to_string(),
            priority: Priority::Medium,
            completed: false,
            completion_date: None,
            enable_reminders: true,
            notes: None,
        };

        assert_eq!(task.id, "task-1");
        assert_eq!(task.name, "demo");
        assert_eq!(task.assignee, "Kim");
        assert_eq!(task.deadline, "2025-03-10");
        assert_eq!(task.priority, Priority::Medium);
        assert!(!task.completed);
        assert_eq!(task.completion_date, None);
        assert!(task.enable_reminders);
        assert_eq!(task.notes, None);
    }

    #[test]
    fn app_error_exposes_code() {
        let err = AppError::invalid_input("missing name");
        assert_eq!(err.code(), "invalid_input");
    }
}
