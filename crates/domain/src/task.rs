use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use taskgate_core::AppError;

use crate::{Classification, PermissionType, SortField};

/// Lifecycle state of a stored task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskState {
    /// Created but not yet configured.
    Unconfigured,
    /// Waiting for auto-assignment.
    PendingAutoAssign,
    /// Assigned to a user.
    Assigned,
    /// Configured but not yet routed.
    Configured,
    /// Available for assignment.
    Unassigned,
    /// Completed by its assignee.
    Completed,
    /// Cancelled.
    Cancelled,
    /// Removed from the active pool.
    Terminated,
    /// Waiting for attribute re-evaluation.
    PendingReconfiguration,
}

impl TaskState {
    /// Returns the stable storage value.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unconfigured => "UNCONFIGURED",
            Self::PendingAutoAssign => "PENDING_AUTO_ASSIGN",
            Self::Assigned => "ASSIGNED",
            Self::Configured => "CONFIGURED",
            Self::Unassigned => "UNASSIGNED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
            Self::Terminated => "TERMINATED",
            Self::PendingReconfiguration => "PENDING_RECONFIGURATION",
        }
    }

    /// Returns all known states.
    #[must_use]
    pub fn all() -> &'static [Self] {
        &[
            Self::Unconfigured,
            Self::PendingAutoAssign,
            Self::Assigned,
            Self::Configured,
            Self::Unassigned,
            Self::Completed,
            Self::Cancelled,
            Self::Terminated,
            Self::PendingReconfiguration,
        ]
    }
}

impl FromStr for TaskState {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_uppercase();
        Self::all()
            .iter()
            .copied()
            .find(|state| state.as_str() == normalized)
            .ok_or_else(|| AppError::Validation(format!("unknown task state '{value}'")))
    }
}

/// Per-role permission row stored alongside a task.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRolePermissions {
    /// Role name this row applies to.
    pub role_name: String,
    /// Optional role category of the row.
    #[serde(default)]
    pub role_category: Option<String>,
    /// Read flag.
    #[serde(default)]
    pub read: bool,
    /// Own flag.
    #[serde(default)]
    pub own: bool,
    /// Execute flag.
    #[serde(default)]
    pub execute: bool,
    /// Manage flag.
    #[serde(default)]
    pub manage: bool,
    /// Cancel flag.
    #[serde(default)]
    pub cancel: bool,
    /// Refer flag.
    #[serde(default)]
    pub refer: bool,
    /// Claim flag.
    #[serde(default)]
    pub claim: bool,
    /// Assign flag.
    #[serde(default)]
    pub assign: bool,
    /// Unassign flag.
    #[serde(default)]
    pub unassign: bool,
    /// Complete flag.
    #[serde(default)]
    pub complete: bool,
    /// Authorisations a challenged role must hold; empty means unrestricted.
    #[serde(default)]
    pub authorizations: Option<Vec<String>>,
}

impl TaskRolePermissions {
    /// Creates a role row with no permissions.
    #[must_use]
    pub fn new(role_name: impl Into<String>) -> Self {
        Self {
            role_name: role_name.into(),
            ..Self::default()
        }
    }

    /// Returns a copy with the given permissions switched on.
    #[must_use]
    pub fn granting(mut self, permissions: &[PermissionType]) -> Self {
        for permission in permissions {
            *self.flag_mut(*permission) = true;
        }
        self
    }

    /// Returns a copy with the given authorisations.
    #[must_use]
    pub fn with_authorizations<I, S>(mut self, authorizations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.authorizations = Some(authorizations.into_iter().map(Into::into).collect());
        self
    }

    /// Returns whether this row grants the permission.
    #[must_use]
    pub fn grants(&self, permission: PermissionType) -> bool {
        match permission {
            PermissionType::Read => self.read,
            PermissionType::Own => self.own,
            PermissionType::Execute => self.execute,
            PermissionType::Manage => self.manage,
            PermissionType::Cancel => self.cancel,
            PermissionType::Refer => self.refer,
            PermissionType::Claim => self.claim,
            PermissionType::Assign => self.assign,
            PermissionType::Unassign => self.unassign,
            PermissionType::Complete => self.complete,
        }
    }

    /// Returns whether the authorisation list is null or empty.
    #[must_use]
    pub fn has_no_authorizations(&self) -> bool {
        self.authorizations
            .as_ref()
            .is_none_or(|authorizations| authorizations.is_empty())
    }

    fn flag_mut(&mut self, permission: PermissionType) -> &mut bool {
        match permission {
            PermissionType::Read => &mut self.read,
            PermissionType::Own => &mut self.own,
            PermissionType::Execute => &mut self.execute,
            PermissionType::Manage => &mut self.manage,
            PermissionType::Cancel => &mut self.cancel,
            PermissionType::Refer => &mut self.refer,
            PermissionType::Claim => &mut self.claim,
            PermissionType::Assign => &mut self.assign,
            PermissionType::Unassign => &mut self.unassign,
            PermissionType::Complete => &mut self.complete,
        }
    }
}

/// Task row as held by the task store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Stable task identifier.
    pub task_id: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Task type identifier, such as `reviewAppeal`.
    pub task_type: String,
    /// Lifecycle state.
    pub state: TaskState,
    /// Owning jurisdiction.
    pub jurisdiction: String,
    /// Optional region.
    #[serde(default)]
    pub region: Option<String>,
    /// Optional base location identifier.
    #[serde(default)]
    pub location: Option<String>,
    /// Optional base location display name.
    #[serde(default)]
    pub location_name: Option<String>,
    /// Case the task belongs to.
    pub case_id: String,
    /// Case type of the owning case.
    pub case_type_id: String,
    /// Optional case display name.
    #[serde(default)]
    pub case_name: Option<String>,
    /// Optional case category.
    #[serde(default)]
    pub case_category: Option<String>,
    /// Current assignee, if any.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Optional work type.
    #[serde(default)]
    pub work_type: Option<String>,
    /// Optional role category responsible for the task.
    #[serde(default)]
    pub role_category: Option<String>,
    /// Security classification of the task.
    pub security_classification: Classification,
    /// Optional display title.
    #[serde(default)]
    pub title: Option<String>,
    /// Optional due date.
    #[serde(default)]
    pub due_date_time: Option<DateTime<Utc>>,
    /// Optional priority date.
    #[serde(default)]
    pub priority_date: Option<DateTime<Utc>>,
    /// Optional major priority; lower sorts first.
    #[serde(default)]
    pub major_priority: Option<i32>,
    /// Optional minor priority; lower sorts first.
    #[serde(default)]
    pub minor_priority: Option<i32>,
    /// Optional next hearing date.
    #[serde(default)]
    pub next_hearing_date: Option<DateTime<Utc>>,
    /// Optional creation instant.
    #[serde(default)]
    pub created: Option<DateTime<Utc>>,
    /// Per-role permission rows.
    #[serde(default)]
    pub roles: Vec<TaskRolePermissions>,
}

/// Comparable value of one sortable task field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TaskSortValue<'a> {
    /// Text column value.
    Text(&'a str),
    /// Integer column value.
    Number(i32),
    /// Timestamp column value.
    Instant(DateTime<Utc>),
}

impl TaskRecord {
    /// Creates a public task with no optional columns and no role rows.
    ///
    /// The task name defaults to the task type.
    #[must_use]
    pub fn new(
        task_id: impl Into<String>,
        task_type: impl Into<String>,
        state: TaskState,
        jurisdiction: impl Into<String>,
        case_id: impl Into<String>,
        case_type_id: impl Into<String>,
    ) -> Self {
        let task_type = task_type.into();
        Self {
            task_id: task_id.into(),
            task_name: task_type.clone(),
            task_type,
            state,
            jurisdiction: jurisdiction.into(),
            region: None,
            location: None,
            location_name: None,
            case_id: case_id.into(),
            case_type_id: case_type_id.into(),
            case_name: None,
            case_category: None,
            assignee: None,
            work_type: None,
            role_category: None,
            security_classification: Classification::Public,
            title: None,
            due_date_time: None,
            priority_date: None,
            major_priority: None,
            minor_priority: None,
            next_hearing_date: None,
            created: None,
            roles: Vec::new(),
        }
    }

    /// Sets the security classification.
    #[must_use]
    pub fn with_classification(mut self, classification: Classification) -> Self {
        self.security_classification = classification;
        self
    }

    /// Appends a role permission row.
    #[must_use]
    pub fn with_role(mut self, role: TaskRolePermissions) -> Self {
        self.roles.push(role);
        self
    }

    /// Returns the value of a sortable field, if present.
    #[must_use]
    pub fn sort_value(&self, field: SortField) -> Option<TaskSortValue<'_>> {
        match field {
            SortField::DueDateTime => self.due_date_time.map(TaskSortValue::Instant),
            SortField::TaskTitle => self.title.as_deref().map(TaskSortValue::Text),
            SortField::LocationName => self.location_name.as_deref().map(TaskSortValue::Text),
            SortField::CaseCategory => self.case_category.as_deref().map(TaskSortValue::Text),
            SortField::CaseId => Some(TaskSortValue::Text(self.case_id.as_str())),
            SortField::CaseName => self.case_name.as_deref().map(TaskSortValue::Text),
            SortField::NextHearingDate => self.next_hearing_date.map(TaskSortValue::Instant),
            SortField::MajorPriority => self.major_priority.map(TaskSortValue::Number),
            SortField::PriorityDate => self.priority_date.map(TaskSortValue::Instant),
            SortField::MinorPriority => self.minor_priority.map(TaskSortValue::Number),
        }
    }
}

/// Lightweight projection returned by summary searches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSummary {
    /// Stable task identifier.
    pub task_id: String,
    /// Human-readable task name.
    pub task_name: String,
    /// Lifecycle state.
    pub state: TaskState,
    /// Case the task belongs to.
    pub case_id: String,
    /// Owning jurisdiction.
    pub jurisdiction: String,
    /// Current assignee, if any.
    pub assignee: Option<String>,
    /// Optional major priority.
    pub major_priority: Option<i32>,
    /// Optional priority date.
    pub priority_date: Option<DateTime<Utc>>,
    /// Optional minor priority.
    pub minor_priority: Option<i32>,
    /// Optional due date.
    pub due_date_time: Option<DateTime<Utc>>,
}

impl From<&TaskRecord> for TaskSummary {
    fn from(task: &TaskRecord) -> Self {
        Self {
            task_id: task.task_id.clone(),
            task_name: task.task_name.clone(),
            state: task.state,
            case_id: task.case_id.clone(),
            jurisdiction: task.jurisdiction.clone(),
            assignee: task.assignee.clone(),
            major_priority: task.major_priority,
            priority_date: task.priority_date,
            minor_priority: task.minor_priority,
            due_date_time: task.due_date_time,
        }
    }
}
