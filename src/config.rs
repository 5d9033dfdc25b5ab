//! Configuration loading and management.
//!
//! Lookup order for the config file:
//! 1. Explicit path (`--config`)
//! 2. Project: `./task-ledger/config.yaml`
//! 3. User: `~/.task-ledger/config.yaml`
//!
//! Missing files fall back to defaults. Environment variables are applied on
//! top of whichever file was used:
//! - `TASK_LEDGER_DATA_DIR` - Directory holding all data files
//! - `TASK_LEDGER_TASKS_FILE` - Task record file name
//! - `TASK_LEDGER_USERS_FILE` - Credential file name
//! - `TASK_LEDGER_ADMINS` - Comma-separated admin usernames

use crate::report::ReportPaths;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub storage: StorageConfig,

    #[serde(default)]
    pub access: AccessConfig,
}

/// File locations. File names are resolved against `data_dir`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    #[serde(default = "default_tasks_file")]
    pub tasks_file: String,

    #[serde(default = "default_users_file")]
    pub users_file: String,

    #[serde(default = "default_task_overview")]
    pub task_overview_file: String,

    #[serde(default = "default_user_overview")]
    pub user_overview_file: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            tasks_file: default_tasks_file(),
            users_file: default_users_file(),
            task_overview_file: default_task_overview(),
            user_overview_file: default_user_overview(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_tasks_file() -> String {
    "tasks.txt".to_string()
}

fn default_users_file() -> String {
    "user.txt".to_string()
}

fn default_task_overview() -> String {
    "task_overview.txt".to_string()
}

fn default_user_overview() -> String {
    "user_overview.txt".to_string()
}

/// Role assignment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessConfig {
    /// Usernames granted the admin role.
    #[serde(default = "default_admins")]
    pub admins: Vec<String>,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            admins: default_admins(),
        }
    }
}

fn default_admins() -> Vec<String> {
    vec!["admin".to_string()]
}

impl StorageConfig {
    pub fn tasks_path(&self) -> PathBuf {
        self.data_dir.join(&self.tasks_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.users_file)
    }

    pub fn report_paths(&self) -> ReportPaths {
        ReportPaths {
            task_overview: self.data_dir.join(&self.task_overview_file),
            user_overview: self.data_dir.join(&self.user_overview_file),
        }
    }
}

impl Config {
    /// Load configuration from a file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Candidate config files, highest priority first.
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("task-ledger").join("config.yaml")];
        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".task-ledger").join("config.yaml"));
        }
        paths
    }

    /// Load the explicit file if given (errors are reported), otherwise the
    /// first discovered file, otherwise defaults. Environment overrides are
    /// applied last.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::load(path)?,
            None => Self::search_paths()
                .into_iter()
                .find(|p| p.exists())
                .map(|p| {
                    debug!(path = %p.display(), "Using discovered config");
                    Self::load(p)
                })
                .transpose()?
                .unwrap_or_default(),
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// Apply `TASK_LEDGER_*` overrides using the given variable lookup.
    pub fn apply_env<F>(&mut self, var: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = var("TASK_LEDGER_DATA_DIR") {
            self.storage.data_dir = PathBuf::from(dir);
        }
        if let Some(file) = var("TASK_LEDGER_TASKS_FILE") {
            self.storage.tasks_file = file;
        }
        if let Some(file) = var("TASK_LEDGER_USERS_FILE") {
            self.storage.users_file = file;
        }
        if let Some(admins) = var("TASK_LEDGER_ADMINS") {
            let admins: Vec<String> = admins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !admins.is_empty() {
                self.access.admins = admins;
            }
        }
    }

    /// Ensure the data directory exists.
    pub fn ensure_data_dir(&self) -> Result<()> {
        std::fs::create_dir_all(&self.storage.data_dir).with_context(|| {
            format!("creating data dir {}", self.storage.data_dir.display())
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::TempDir;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.storage.tasks_path(), PathBuf::from("./tasks.txt"));
        assert_eq!(config.storage.users_path(), PathBuf::from("./user.txt"));
        assert_eq!(config.access.admins, vec!["admin"]);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(
            &path,
            r#"
storage:
  data_dir: /srv/ledger
access:
  admins: [root, admin]
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.storage.data_dir, PathBuf::from("/srv/ledger"));
        assert_eq!(config.storage.tasks_file, "tasks.txt");
        assert_eq!(config.access.admins, vec!["root", "admin"]);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = [
            ("TASK_LEDGER_DATA_DIR", "/tmp/ledger"),
            ("TASK_LEDGER_USERS_FILE", "people.txt"),
            ("TASK_LEDGER_ADMINS", " ops , admin ,"),
        ]
        .into_iter()
        .collect();

        let mut config = Config::default();
        config.apply_env(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.storage.users_path(), PathBuf::from("/tmp/ledger/people.txt"));
        assert_eq!(config.storage.tasks_file, "tasks.txt");
        assert_eq!(config.access.admins, vec!["ops", "admin"]);
    }

    #[test]
    fn test_explicit_missing_file_errors() {
        let temp = TempDir::new().unwrap();
        let missing = temp.path().join("nope.yaml");
        assert!(Config::resolve(Some(missing.as_path())).is_err());
    }
}
