use crate::config::Config;
use crate::date;
use crate::error::AppError;
use crate::model::{Priority, Task};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::process::{Command, Stdio};

const ADVISOR_ENV_VAR: &str = "SCHEDMATE_ADVISOR_CMD";

/// Shown when the task list is empty before filtering.
pub const NO_TASKS_MESSAGE: &str =
    "추천할 스케줄을 만들기 위한 업무가 없습니다. 먼저 업무를 추가해주세요.";
/// Shown when every task is already completed.
pub const NO_PENDING_MESSAGE: &str = "완료되지 않은 업무가 없어 스케줄을 추천할 수 없습니다.";
/// Shown for any failure of the external call, whatever the cause.
pub const FAILURE_MESSAGE: &str =
    "AI 스케줄 추천을 받는 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequestTask {
    pub name: String,
    pub assignee: String,
    pub deadline: String,
    pub priority: Priority,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleRequest {
    pub tasks: Vec<ScheduleRequestTask>,
}

impl ScheduleRequest {
    /// Request-side schema validation: every field present and well
    /// formed. A malformed request fails the call instead of being
    /// coerced into a prompt.
    pub fn validate(&self) -> Result<(), AppError> {
        for task in &self.tasks {
            if task.name.trim().is_empty() {
                return Err(AppError::invalid_data("request task name is blank"));
            }
            if task.assignee.trim().is_empty() {
                return Err(AppError::invalid_data("request task assignee is blank"));
            }
            date::parse_local_date(&task.deadline)
                .map_err(|_| AppError::invalid_data("request task deadline is malformed"))?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleResponse {
    #[serde(rename = "scheduleSuggestions")]
    pub schedule_suggestions: String,
}

/// External text-generation boundary. One attempt, no retry; the caller
/// maps any failure to `FAILURE_MESSAGE`.
pub trait ScheduleAdvisor {
    fn suggest_schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, AppError>;
}

/// Compose the advisor flow: restrict to incomplete tasks, short-circuit
/// the two empty cases without touching the external interface, and map
/// any call failure to the fixed localized error string.
pub fn suggest(tasks: &[Task], advisor: &dyn ScheduleAdvisor) -> String {
    if tasks.is_empty() {
        return NO_TASKS_MESSAGE.to_string();
    }

    let pending: Vec<ScheduleRequestTask> = tasks
        .iter()
        .filter(|task| !task.completed)
        .map(|task| ScheduleRequestTask {
            name: task.name.clone(),
            assignee: task.assignee.clone(),
            deadline: task.deadline.clone(),
            priority: task.priority,
        })
        .collect();

    if pending.is_empty() {
        return NO_PENDING_MESSAGE.to_string();
    }

    let request = ScheduleRequest { tasks: pending };
    if request.validate().is_err() {
        return FAILURE_MESSAGE.to_string();
    }

    match advisor.suggest_schedule(&request) {
        Ok(response) if !response.schedule_suggestions.trim().is_empty() => {
            response.schedule_suggestions
        }
        _ => FAILURE_MESSAGE.to_string(),
    }
}

/// The instruction template the external model receives.
pub fn build_prompt(request: &ScheduleRequest) -> String {
    let mut prompt = String::from(
        "You are an AI assistant that specializes in creating optimized schedules.\n\n\
         Given the following tasks, their assignees, deadlines, and priorities, \
         create an optimized schedule in markdown format.\n\nTasks:\n",
    );

    for task in &request.tasks {
        prompt.push_str(&format!(
            "- Task Name: {}\n  Assignee: {}\n  Deadline: {}\n  Priority: {}\n",
            task.name,
            task.assignee,
            task.deadline,
            task.priority.as_str()
        ));
    }

    prompt.push_str(
        "\nConsider the priority and deadlines of each task to create the most \
         efficient schedule.\nThe schedule should include time slots and assigned \
         tasks. Use Korean for all text.\nUse markdown to format the output.\n",
    );

    prompt
}

/// The JSON object an external command reads on stdin: the rendered
/// instruction prompt plus the structured task list.
fn command_payload(request: &ScheduleRequest) -> Result<String, AppError> {
    let payload = serde_json::json!({
        "prompt": build_prompt(request),
        "tasks": request.tasks,
    });
    serde_json::to_string(&payload).map_err(|err| AppError::invalid_data(err.to_string()))
}

/// Runs a configured external command, feeding it the prompt-and-tasks
/// payload on stdin and parsing its stdout as a `ScheduleResponse`.
pub struct CommandAdvisor {
    program: String,
}

impl CommandAdvisor {
    pub fn new<P: Into<String>>(program: P) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ScheduleAdvisor for CommandAdvisor {
    fn suggest_schedule(&self, request: &ScheduleRequest) -> Result<ScheduleResponse, AppError> {
        request.validate()?;

        let mut parts = self.program.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| AppError::advisor("advisor command is empty"))?;

        let payload = command_payload(request)?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|err| AppError::advisor(err.to_string()))?;

        if let Some(stdin) = child.stdin.as_mut() {
            stdin
                .write_all(payload.as_bytes())
                .map_err(|err| AppError::advisor(err.to_string()))?;
        }

        let output = child
            .wait_with_output()
            .map_err(|err| AppError::advisor(err.to_string()))?;

        if !output.status.success() {
            return Err(AppError::advisor("advisor command exited with failure"));
        }

        let response: ScheduleResponse = serde_json::from_slice(&output.stdout)
            .map_err(|err| AppError::advisor(format!("invalid advisor response: {err}")))?;
        Ok(response)
    }
}

/// Always fails; selected when no advisor command is configured so the
/// suggest flow degrades to its localized error string.
pub struct UnavailableAdvisor;

impl ScheduleAdvisor for UnavailableAdvisor {
    fn suggest_schedule(&self, _request: &ScheduleRequest) -> Result<ScheduleResponse, AppError> {
        Err(AppError::advisor("advisor command is not configured"))
    }
}

pub fn advisor_from_env(config: &Config) -> Box<dyn ScheduleAdvisor> {
    if let Ok(command) = std::env::var(ADVISOR_ENV_VAR)
        && !command.trim().is_empty()
    {
        return Box::new(CommandAdvisor::new(command));
    }

    match config.advisor_command.as_deref() {
        Some(command) if !command.trim().is_empty() => Box::new(CommandAdvisor::new(command)),
        _ => Box::new(UnavailableAdvisor),
    }
}
