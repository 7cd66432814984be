use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskgate_core::AppError;

/// Capability flags stored on each task role row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionType {
    /// Allows viewing the task.
    Read,
    /// Allows owning the task.
    Own,
    /// Allows executing the task.
    Execute,
    /// Allows managing the task.
    Manage,
    /// Allows cancelling the task.
    Cancel,
    /// Allows referring the task.
    Refer,
    /// Allows claiming the task.
    Claim,
    /// Allows assigning the task to others.
    Assign,
    /// Allows unassigning the task.
    Unassign,
    /// Allows completing the task.
    Complete,
}

impl PermissionType {
    /// Returns a stable storage value for this permission.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Read => "read",
            Self::Own => "own",
            Self::Execute => "execute",
            Self::Manage => "manage",
            Self::Cancel => "cancel",
            Self::Refer => "refer",
            Self::Claim => "claim",
            Self::Assign => "assign",
            Self::Unassign => "unassign",
            Self::Complete => "complete",
        }
    }

    /// Returns all known permissions.
    #[must_use]
    pub fn all() -> &'static [Self] {
        const ALL: &[PermissionType] = &[
            PermissionType::Read,
            PermissionType::Own,
            PermissionType::Execute,
            PermissionType::Manage,
            PermissionType::Cancel,
            PermissionType::Refer,
            PermissionType::Claim,
            PermissionType::Assign,
            PermissionType::Unassign,
            PermissionType::Complete,
        ];

        ALL
    }
}

impl FromStr for PermissionType {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|permission| permission.as_str() == normalized)
            .ok_or_else(|| AppError::Validation(format!("unknown permission value '{value}'")))
    }
}
