use std::str::FromStr;

use serde::{Deserialize, Serialize};
use taskgate_core::{AppError, AppResult};

use crate::{SortingParameter, TaskState};

/// Search dimension named by a transport search parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchParameterKey {
    /// Task jurisdiction.
    Jurisdiction,
    /// Task state.
    State,
    /// Task base location.
    Location,
    /// Task region.
    Region,
    /// Case identifier.
    CaseId,
    /// Task assignee.
    User,
    /// Task work type.
    WorkType,
    /// Task role category.
    RoleCategory,
    /// Task type.
    TaskType,
    /// Task identifier.
    TaskId,
}

/// Comparison operator of a transport search parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SearchOperator {
    /// Membership in the supplied values.
    In,
}

/// One `{key, operator, values}` entry of a search payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchParameter {
    /// Dimension being filtered.
    pub key: SearchParameterKey,
    /// Comparison operator.
    pub operator: SearchOperator,
    /// Accepted values.
    #[serde(default)]
    pub values: Vec<String>,
}

/// Search payload as received from callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchTaskRequest {
    /// Filter parameters.
    #[serde(default)]
    pub search_parameters: Vec<SearchParameter>,
    /// Optional sort instructions.
    #[serde(default)]
    pub sorting_parameters: Option<Vec<SortingParameter>>,
}

/// Typed search request with one ordered value list per dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchRequest {
    /// Accepted jurisdictions.
    pub jurisdictions: Vec<String>,
    /// Accepted states.
    pub states: Vec<TaskState>,
    /// Accepted base locations.
    pub locations: Vec<String>,
    /// Accepted regions.
    pub regions: Vec<String>,
    /// Accepted case identifiers.
    pub case_ids: Vec<String>,
    /// Accepted assignees.
    pub users: Vec<String>,
    /// Accepted work types.
    pub work_types: Vec<String>,
    /// Accepted role categories.
    pub role_categories: Vec<String>,
    /// Accepted task types.
    pub task_types: Vec<String>,
    /// Accepted task identifiers.
    pub task_ids: Vec<String>,
    /// Ordered sort instructions.
    pub sorting_parameters: Vec<SortingParameter>,
}

impl SearchRequest {
    /// Returns whether at least one filter dimension carries a value.
    #[must_use]
    pub fn has_filters(&self) -> bool {
        !(self.jurisdictions.is_empty()
            && self.states.is_empty()
            && self.locations.is_empty()
            && self.regions.is_empty()
            && self.case_ids.is_empty()
            && self.users.is_empty()
            && self.work_types.is_empty()
            && self.role_categories.is_empty()
            && self.task_types.is_empty()
            && self.task_ids.is_empty())
    }

    /// Rejects requests that would compile into an unconstrained search.
    pub fn ensure_has_filters(&self) -> AppResult<()> {
        if self.has_filters() {
            return Ok(());
        }

        Err(AppError::Validation(
            "search requests must include at least one filter value".to_owned(),
        ))
    }
}

impl TryFrom<SearchTaskRequest> for SearchRequest {
    type Error = AppError;

    fn try_from(value: SearchTaskRequest) -> Result<Self, Self::Error> {
        let mut request = Self {
            sorting_parameters: value.sorting_parameters.unwrap_or_default(),
            ..Self::default()
        };

        for parameter in value.search_parameters {
            let values = parameter
                .values
                .into_iter()
                .map(|value| value.trim().to_owned())
                .filter(|value| !value.is_empty());

            match parameter.key {
                SearchParameterKey::Jurisdiction => request.jurisdictions.extend(values),
                SearchParameterKey::State => {
                    for value in values {
                        request.states.push(TaskState::from_str(value.as_str())?);
                    }
                }
                SearchParameterKey::Location => request.locations.extend(values),
                SearchParameterKey::Region => request.regions.extend(values),
                SearchParameterKey::CaseId => request.case_ids.extend(values),
                SearchParameterKey::User => request.users.extend(values),
                SearchParameterKey::WorkType => request.work_types.extend(values),
                SearchParameterKey::RoleCategory => request.role_categories.extend(values),
                SearchParameterKey::TaskType => request.task_types.extend(values),
                SearchParameterKey::TaskId => request.task_ids.extend(values),
            }
        }

        Ok(request)
    }
}
