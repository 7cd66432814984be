use serde::{Deserialize, Serialize};

/// Sort direction for one sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    /// Ascending order.
    Asc,
    /// Descending order.
    Desc,
}

impl SortDirection {
    /// Parses a transport value, returning `None` when it is not recognised.
    #[must_use]
    pub fn parse_transport(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Some(Self::Asc),
            "desc" | "descending" => Some(Self::Desc),
            _ => None,
        }
    }
}

/// Task fields a search may be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SortField {
    /// Task due date.
    DueDateTime,
    /// Task display title.
    TaskTitle,
    /// Base location display name.
    LocationName,
    /// Case category.
    CaseCategory,
    /// Case identifier.
    CaseId,
    /// Case display name.
    CaseName,
    /// Next hearing date of the case.
    NextHearingDate,
    /// Major priority.
    MajorPriority,
    /// Priority date.
    PriorityDate,
    /// Minor priority.
    MinorPriority,
}

impl SortField {
    /// Resolves a transport sort key in camelCase or snake_case form.
    #[must_use]
    pub fn parse_transport(value: &str) -> Option<Self> {
        match value.trim() {
            "dueDate" | "due_date" | "dueDateTime" | "due_date_time" => Some(Self::DueDateTime),
            "taskTitle" | "task_title" => Some(Self::TaskTitle),
            "locationName" | "location_name" => Some(Self::LocationName),
            "caseCategory" | "case_category" => Some(Self::CaseCategory),
            "caseId" | "case_id" => Some(Self::CaseId),
            "caseName" | "case_name" => Some(Self::CaseName),
            "nextHearingDate" | "next_hearing_date" => Some(Self::NextHearingDate),
            "majorPriority" | "major_priority" => Some(Self::MajorPriority),
            "priorityDate" | "priority_date" => Some(Self::PriorityDate),
            "minorPriority" | "minor_priority" => Some(Self::MinorPriority),
            _ => None,
        }
    }

    /// Returns the task store column backing this field.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::DueDateTime => "due_date_time",
            Self::TaskTitle => "title",
            Self::LocationName => "location_name",
            Self::CaseCategory => "case_category",
            Self::CaseId => "case_id",
            Self::CaseName => "case_name",
            Self::NextHearingDate => "next_hearing_date",
            Self::MajorPriority => "major_priority",
            Self::PriorityDate => "priority_date",
            Self::MinorPriority => "minor_priority",
        }
    }

    /// Returns whether this field holds text and so orders by code point.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            Self::TaskTitle
                | Self::LocationName
                | Self::CaseCategory
                | Self::CaseId
                | Self::CaseName
        )
    }
}

/// Raw sort instruction as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingParameter {
    /// Requested sort key.
    pub sort_by: String,
    /// Requested direction.
    pub sort_order: String,
}

impl SortingParameter {
    /// Creates a sort instruction.
    #[must_use]
    pub fn new(sort_by: impl Into<String>, sort_order: impl Into<String>) -> Self {
        Self {
            sort_by: sort_by.into(),
            sort_order: sort_order.into(),
        }
    }

    /// Resolves the instruction, returning `None` when either part is unknown.
    #[must_use]
    pub fn resolve(&self) -> Option<(SortField, SortDirection)> {
        Some((
            SortField::parse_transport(self.sort_by.as_str())?,
            SortDirection::parse_transport(self.sort_order.as_str())?,
        ))
    }
}
