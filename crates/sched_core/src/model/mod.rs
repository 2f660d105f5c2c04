mod task;

pub use task::{Priority, Task, TaskDraft, UNASSIGNED_LABEL};
