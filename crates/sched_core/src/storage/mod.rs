use crate::error::AppError;

pub mod json_store;

pub use json_store::FileStore;

/// Snapshot key for the task collection.
pub const TASKS_KEY: &str = "tasks";
/// Snapshot key for the assignee roster.
pub const ASSIGNEES_KEY: &str = "assignees";

/// Injected persistence boundary. Each key holds one whole-collection
/// JSON snapshot; writes replace the previous snapshot entirely.
pub trait StoragePort {
    fn read_snapshot(&self, key: &str) -> Result<Option<String>, AppError>;
    fn write_snapshot(&self, key: &str, content: &str) -> Result<(), AppError>;
}
