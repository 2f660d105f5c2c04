use crate::error::AppError;
use crate::storage::StoragePort;
use std::path::{Path, PathBuf};

const STORE_DIR_ENV_VAR: &str = "SCHEDMATE_STORE_DIR";

/// File-per-key snapshot store. `tasks` lives in `tasks.json`,
/// `assignees` in `assignees.json`, under the resolved store directory.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn from_env() -> Result<Self, AppError> {
        Ok(Self::new(store_dir()?))
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl StoragePort for FileStore {
    fn read_snapshot(&self, key: &str) -> Result<Option<String>, AppError> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&path).map_err(|err| AppError::io(err.to_string()))?;
        Ok(Some(content))
    }

    fn write_snapshot(&self, key: &str, content: &str) -> Result<(), AppError> {
        let path = self.key_path(key);
        write_snapshot_file(&path, content)
    }
}

pub fn store_dir() -> Result<PathBuf, AppError> {
    if let Ok(dir) = std::env::var(STORE_DIR_ENV_VAR)
        && !dir.trim().is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    if cfg!(windows) {
        let appdata =
            std::env::var("APPDATA").map_err(|_| AppError::invalid_data("APPDATA is not set"))?;
        Ok(PathBuf::from(appdata).join("schedmate"))
    } else {
        let home = std::env::var("HOME").map_err(|_| AppError::invalid_data("HOME is not set"))?;
        Ok(PathBuf::from(home).join(".config").join("schedmate"))
    }
}

fn write_snapshot_file(path: &Path, content: &str) -> Result<(), AppError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|err| AppError::io(err.to_string()))?;
    }

    std::fs::write(path, content).map_err(|err| AppError::io(err.to_string()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions).map_err(|err| AppError::io(err.to_string()))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::FileStore;
    use crate::storage::StoragePort;
    use std::fs;
    use std::path::PathBuf;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn temp_dir(label: &str) -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("schedmate-{nanos}-{label}"))
    }

    #[test]
    fn read_snapshot_returns_none_when_missing() {
        let store = FileStore::new(temp_dir("missing"));
        assert_eq!(store.read_snapshot("tasks").unwrap(), None);
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = temp_dir("round-trip");
        let store = FileStore::new(dir.clone());

        store.write_snapshot("tasks", "[]").unwrap();
        let content = store.read_snapshot("tasks").unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(content.as_deref(), Some("[]"));
    }

    #[test]
    fn keys_map_to_separate_files() {
        let dir = temp_dir("keys");
        let store = FileStore::new(dir.clone());

        store.write_snapshot("tasks", "[1]").unwrap();
        store.write_snapshot("assignees", "[2]").unwrap();
        let tasks = store.read_snapshot("tasks").unwrap();
        let assignees = store.read_snapshot("assignees").unwrap();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(tasks.as_deref(), Some("[1]"));
        assert_eq!(assignees.as_deref(), Some("[2]"));
    }

    #[cfg(unix)]
    #[test]
    fn snapshot_files_are_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let dir = temp_dir("perms");
        let store = FileStore::new(dir.clone());

        store.write_snapshot("tasks", "[]").unwrap();
        let mode = fs::metadata(dir.join("tasks.json"))
            .unwrap()
            .permissions()
            .mode();
        fs::remove_dir_all(&dir).ok();

        assert_eq!(mode & 0o777, 0o600);
    }
}
