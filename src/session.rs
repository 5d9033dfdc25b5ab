//! Caller identity and role-based capability checks.

use crate::error::{TrackerError, TrackerResult};
use serde::{Deserialize, Serialize};

/// Role assigned to a logged-in user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Member,
}

/// Operations that may be restricted by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    AddTask,
    ViewAllTasks,
    EditOwnTasks,
    EditAnyTask,
    RegisterUser,
    GenerateReports,
    ViewStatistics,
}

impl Capability {
    pub fn describe(&self) -> &'static str {
        match self {
            Capability::AddTask => "add task",
            Capability::ViewAllTasks => "view all tasks",
            Capability::EditOwnTasks => "edit tasks",
            Capability::EditAnyTask => "edit other users' tasks",
            Capability::RegisterUser => "register user",
            Capability::GenerateReports => "generate reports",
            Capability::ViewStatistics => "display statistics",
        }
    }
}

impl Role {
    /// Resolve a role from the configured admin usernames.
    pub fn for_user(username: &str, admins: &[String]) -> Self {
        if admins.iter().any(|a| a == username) {
            Role::Admin
        } else {
            Role::Member
        }
    }

    pub fn grants(&self, capability: Capability) -> bool {
        match self {
            Role::Admin => true,
            Role::Member => !matches!(
                capability,
                Capability::EditAnyTask
                    | Capability::GenerateReports
                    | Capability::ViewStatistics
            ),
        }
    }
}

/// An authenticated caller, passed explicitly to operations that depend on
/// who is asking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self {
            username: username.into(),
            role,
        }
    }

    pub fn can(&self, capability: Capability) -> bool {
        self.role.grants(capability)
    }

    pub fn require(&self, capability: Capability) -> TrackerResult<()> {
        if self.can(capability) {
            Ok(())
        } else {
            Err(TrackerError::AccessDenied {
                user: self.username.clone(),
                action: capability.describe(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_role_from_admin_list() {
        let admins = vec!["admin".to_string(), "root".to_string()];
        assert_eq!(Role::for_user("admin", &admins), Role::Admin);
        assert_eq!(Role::for_user("root", &admins), Role::Admin);
        assert_eq!(Role::for_user("bob", &admins), Role::Member);
    }

    #[test]
    fn test_member_cannot_report() {
        let session = Session::new("bob", Role::Member);
        assert!(session.can(Capability::AddTask));
        assert!(session.can(Capability::RegisterUser));

        let err = session.require(Capability::GenerateReports).unwrap_err();
        assert_eq!(err.code(), ErrorCode::AccessDenied);
        assert!(session.require(Capability::ViewStatistics).is_err());
        assert!(session.require(Capability::EditAnyTask).is_err());
    }

    #[test]
    fn test_admin_has_everything() {
        let session = Session::new("admin", Role::Admin);
        assert!(session.require(Capability::GenerateReports).is_ok());
        assert!(session.require(Capability::ViewStatistics).is_ok());
    }
}
