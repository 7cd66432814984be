use taskgate_domain::PermissionType;

/// Task store field a predicate leaf compares against.
///
/// Every field except [`TaskField::RoleName`] lives on the task row; role
/// fields are read from the task-role row paired with the task during
/// evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaskField {
    /// Task identifier.
    TaskId,
    /// Task type.
    TaskType,
    /// Lifecycle state.
    State,
    /// Jurisdiction.
    Jurisdiction,
    /// Region.
    Region,
    /// Base location.
    Location,
    /// Case identifier.
    CaseId,
    /// Case type identifier.
    CaseTypeId,
    /// Assignee.
    Assignee,
    /// Work type.
    WorkType,
    /// Role category responsible for the task.
    RoleCategory,
    /// Security classification.
    SecurityClassification,
    /// Role name of the paired task-role row.
    RoleName,
}

impl TaskField {
    /// Returns the column name in the task store.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::TaskId => "task_id",
            Self::TaskType => "task_type",
            Self::State => "state",
            Self::Jurisdiction => "jurisdiction",
            Self::Region => "region",
            Self::Location => "location",
            Self::CaseId => "case_id",
            Self::CaseTypeId => "case_type_id",
            Self::Assignee => "assignee",
            Self::WorkType => "work_type",
            Self::RoleCategory => "role_category",
            Self::SecurityClassification => "security_classification",
            Self::RoleName => "role_name",
        }
    }

    /// Returns whether the field is read from the task-role row.
    #[must_use]
    pub fn is_role_field(&self) -> bool {
        matches!(self, Self::RoleName)
    }
}

/// Storage-agnostic boolean expression over a (task, task-role) row pair.
///
/// A task matches a predicate when at least one of its role rows satisfies
/// the whole expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskPredicate {
    /// Matches every row.
    Always,
    /// Matches no row.
    Never,
    /// Every child must match.
    And(Vec<TaskPredicate>),
    /// Any child may match.
    Or(Vec<TaskPredicate>),
    /// Field equals the value.
    Equals {
        /// Compared field.
        field: TaskField,
        /// Expected value.
        value: String,
    },
    /// Field is one of the values.
    In {
        /// Compared field.
        field: TaskField,
        /// Accepted values.
        values: Vec<String>,
    },
    /// The role row's authorisation list is null or empty.
    AuthorizationsEmpty,
    /// The role row's authorisation list shares a value with the given set.
    AuthorizationsOverlap(Vec<String>),
    /// The role row grants the permission.
    PermissionGranted(PermissionType),
}

impl TaskPredicate {
    /// Builds a conjunction, folding constant children.
    #[must_use]
    pub fn and(children: impl IntoIterator<Item = TaskPredicate>) -> Self {
        let mut nodes = Vec::new();
        for child in children {
            match child {
                Self::Always => {}
                Self::Never => return Self::Never,
                Self::And(nested) => nodes.extend(nested),
                other => nodes.push(other),
            }
        }

        match nodes.len() {
            0 => Self::Always,
            1 => nodes.pop().unwrap_or(Self::Always),
            _ => Self::And(nodes),
        }
    }

    /// Builds a disjunction, folding constant children.
    #[must_use]
    pub fn or(children: impl IntoIterator<Item = TaskPredicate>) -> Self {
        let mut nodes = Vec::new();
        for child in children {
            match child {
                Self::Never => {}
                Self::Always => return Self::Always,
                Self::Or(nested) => nodes.extend(nested),
                other => nodes.push(other),
            }
        }

        match nodes.len() {
            0 => Self::Never,
            1 => nodes.pop().unwrap_or(Self::Never),
            _ => Self::Or(nodes),
        }
    }

    /// Builds an equality leaf.
    #[must_use]
    pub fn equals(field: TaskField, value: impl Into<String>) -> Self {
        Self::Equals {
            field,
            value: value.into(),
        }
    }

    /// Builds a strict membership leaf; an empty value list matches nothing.
    #[must_use]
    pub fn is_in<I, S>(field: TaskField, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        if values.is_empty() {
            return Self::Never;
        }

        Self::In { field, values }
    }

    /// Returns whether the predicate can never match.
    #[must_use]
    pub fn is_never(&self) -> bool {
        matches!(self, Self::Never)
    }
}
