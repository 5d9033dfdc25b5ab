//! User credential directory.

use super::codec::{DELIMITER, check_field};
use super::{append_line, read_optional};
use crate::error::{TrackerError, TrackerResult};
use crate::types::UserRecord;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Credentials written when the directory file does not exist yet.
pub const BOOTSTRAP_USER: &str = "admin";
pub const BOOTSTRAP_PASSWORD: &str = "password";

/// Why a login attempt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginError {
    UnknownUser,
    WrongPassword,
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoginError::UnknownUser => write!(f, "User does not exist"),
            LoginError::WrongPassword => write!(f, "Wrong password"),
        }
    }
}

/// Handle to the `username;password` credential file.
#[derive(Debug, Clone)]
pub struct UserDirectory {
    path: PathBuf,
}

impl UserDirectory {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Open the directory, creating it with the bootstrap admin if absent.
    pub fn open(path: impl Into<PathBuf>) -> TrackerResult<Self> {
        let dir = Self::new(path);
        dir.bootstrap()?;
        Ok(dir)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create the credential file with the default admin account.
    /// Returns `true` if the file was created.
    pub fn bootstrap(&self) -> TrackerResult<bool> {
        if self.path.exists() {
            return Ok(false);
        }
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(|e| TrackerError::storage(parent, e))?;
        }
        fs::write(
            &self.path,
            format!("{}{}{}\n", BOOTSTRAP_USER, DELIMITER, BOOTSTRAP_PASSWORD),
        )
        .map_err(|e| TrackerError::storage(&self.path, e))?;
        info!(path = %self.path.display(), "Created user directory with default admin");
        Ok(true)
    }

    /// All users in file order. Lines without a delimiter or with an empty
    /// username are skipped.
    pub fn load(&self) -> TrackerResult<Vec<UserRecord>> {
        let content = read_optional(&self.path)?.unwrap_or_default();
        let mut users = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.trim().is_empty() {
                continue;
            }
            match line.split_once(DELIMITER) {
                Some((username, password)) if !username.trim().is_empty() => {
                    users.push(UserRecord {
                        username: username.to_string(),
                        password: password.to_string(),
                    });
                }
                _ => warn!(line = idx + 1, "Skipping malformed user record"),
            }
        }
        Ok(users)
    }

    fn find(&self, username: &str) -> TrackerResult<Option<UserRecord>> {
        Ok(self.load()?.into_iter().find(|u| u.username == username))
    }

    pub fn exists(&self, username: &str) -> TrackerResult<bool> {
        Ok(self.find(username)?.is_some())
    }

    /// Fails closed: an unknown user never verifies.
    pub fn verify(&self, username: &str, password: &str) -> TrackerResult<bool> {
        Ok(self
            .find(username)?
            .is_some_and(|u| u.password == password))
    }

    /// Like [`verify`](Self::verify) but says which check failed.
    pub fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> TrackerResult<Result<(), LoginError>> {
        Ok(match self.find(username)? {
            None => Err(LoginError::UnknownUser),
            Some(u) if u.password != password => Err(LoginError::WrongPassword),
            Some(_) => Ok(()),
        })
    }

    /// Register a new user after validating the name and password pair.
    /// Surrounding whitespace is stripped from the username before storing.
    pub fn register(&self, username: &str, password: &str, confirm: &str) -> TrackerResult<()> {
        let username = username.trim();
        if username.is_empty() {
            return Err(TrackerError::UsernameEmpty);
        }
        check_field("username", username)?;
        check_field("password", password)?;
        if self.exists(username)? {
            return Err(TrackerError::UsernameTaken(username.to_string()));
        }
        if password.is_empty() || password != confirm {
            return Err(TrackerError::PasswordMismatch);
        }

        append_line(&self.path, &format!("{}{}{}", username, DELIMITER, password))?;
        info!(username = %username, "User registered");
        Ok(())
    }
}
