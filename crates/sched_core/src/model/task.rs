use serde::{Deserialize, Serialize};

pub const UNASSIGNED_LABEL: &str = "미지정";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Sort rank: high sorts before medium sorts before low.
    pub fn rank(self) -> u8 {
        match self {
            Self::High => 0,
            Self::Medium => 1,
            Self::Low => 2,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::High => "높음",
            Self::Medium => "보통",
            Self::Low => "낮음",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub assignee: String,
    /// Always `YYYY-MM-DD`; parsed only through `date::parse_local_date`.
    pub deadline: String,
    pub priority: Priority,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completion_date: Option<String>,
    #[serde(default = "default_reminders")]
    pub enable_reminders: bool,
    #[serde(default)]
    pub notes: Option<String>,
}

fn default_reminders() -> bool {
    true
}

/// Draft fields covered by create and update. Everything else
/// (id, completion state, reminder flag) is owned by the repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub name: String,
    pub assignee: String,
    pub deadline: String,
    pub priority: Priority,
    pub notes: Option<String>,
}
