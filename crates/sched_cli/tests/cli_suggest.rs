use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

const NO_TASKS_MESSAGE: &str =
    "추천할 스케줄을 만들기 위한 업무가 없습니다. 먼저 업무를 추가해주세요.";
const FAILURE_MESSAGE: &str =
    "AI 스케줄 추천을 받는 중 오류가 발생했습니다. 잠시 후 다시 시도해주세요.";

fn temp_dir(label: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let dir = std::env::temp_dir().join(format!("schedmate-{nanos}-{label}"));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn schedmate(store_dir: &PathBuf) -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_schedmate"));
    command
        .env("SCHEDMATE_STORE_DIR", store_dir)
        .env("SCHEDMATE_CONFIG_PATH", store_dir.join("no-config.json"))
        .env_remove("SCHEDMATE_ADVISOR_CMD");
    command
}

fn seed_tasks(store_dir: &PathBuf, tasks: serde_json::Value) {
    std::fs::write(
        store_dir.join("tasks.json"),
        serde_json::to_string_pretty(&tasks).unwrap(),
    )
    .unwrap();
}

fn open_task() -> serde_json::Value {
    serde_json::json!({
        "id": "task-1",
        "name": "보고서 작성",
        "assignee": "Kim",
        "deadline": "2025-03-10",
        "priority": "high",
        "completed": false,
        "enable_reminders": true
    })
}

#[test]
fn suggest_with_empty_store_prints_the_no_tasks_message() {
    let dir = temp_dir("suggest-empty");

    let output = schedmate(&dir).args(["suggest"]).output().unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(NO_TASKS_MESSAGE));
}

#[test]
fn suggest_without_configured_advisor_prints_the_failure_message() {
    let dir = temp_dir("suggest-unconfigured");
    seed_tasks(&dir, serde_json::json!([open_task()]));

    let output = schedmate(&dir).args(["suggest"]).output().unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(FAILURE_MESSAGE));
}

#[cfg(unix)]
#[test]
fn suggest_prints_the_suggestion_from_the_configured_command() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir("suggest-command");
    seed_tasks(&dir, serde_json::json!([open_task()]));

    let script_path = dir.join("advisor.sh");
    let capture_path = dir.join("stdin-capture.json");
    std::fs::write(
        &script_path,
        format!(
            "#!/bin/sh\ncat > \"{}\"\nprintf '%s' '{{\"scheduleSuggestions\": \"## 일정\\n- 09:00 보고서 작성\"}}'\n",
            capture_path.display()
        ),
    )
    .unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = schedmate(&dir)
        .args(["suggest"])
        .env("SCHEDMATE_ADVISOR_CMD", &script_path)
        .output()
        .unwrap();
    let received = std::fs::read_to_string(&capture_path).unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("## 일정"));
    assert!(stdout.contains("09:00 보고서 작성"));

    // The command receives the instruction prompt along with the tasks.
    let payload: serde_json::Value = serde_json::from_str(&received).unwrap();
    assert!(
        payload["prompt"]
            .as_str()
            .unwrap()
            .contains("You are an AI assistant")
    );
    assert_eq!(payload["tasks"][0]["name"], "보고서 작성");
}

#[cfg(unix)]
#[test]
fn suggest_with_failing_command_prints_the_failure_message() {
    use std::os::unix::fs::PermissionsExt;

    let dir = temp_dir("suggest-failing");
    seed_tasks(&dir, serde_json::json!([open_task()]));

    let script_path = dir.join("advisor.sh");
    std::fs::write(&script_path, "#!/bin/sh\nexit 1\n").unwrap();
    std::fs::set_permissions(&script_path, std::fs::Permissions::from_mode(0o755)).unwrap();

    let output = schedmate(&dir)
        .args(["suggest"])
        .env("SCHEDMATE_ADVISOR_CMD", &script_path)
        .output()
        .unwrap();
    std::fs::remove_dir_all(&dir).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(FAILURE_MESSAGE));
}
