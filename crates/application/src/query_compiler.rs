//! Compiles role assignments and search requests into task predicates.
//!
//! Every function here is pure: inputs in, predicate out. The compiled
//! search predicate has the shape
//! `(OR of active role predicates) AND (AND of required permissions) AND
//! (AND of business filters)`.

use chrono::{DateTime, Utc};
use taskgate_domain::{PermissionType, RoleAssignment, SearchRequest, TaskState};

use crate::{TaskField, TaskPredicate, TaskSort};

mod attribute_constraints;
mod classification;
mod field_filters;
mod grant_types;
mod permissions;
mod role_validity;

#[cfg(test)]
mod tests;

pub use field_filters::field_filter;
pub use role_validity::is_active;

/// Predicate plus sort order handed to a task store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTaskQuery {
    /// Row filter.
    pub predicate: TaskPredicate,
    /// Deterministic sort order.
    pub sort: TaskSort,
}

/// Compiles a full-task search.
///
/// Sorts by the request's resolvable sort keys, or by due date descending.
#[must_use]
pub fn compile_search(
    request: &SearchRequest,
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> CompiledTaskQuery {
    CompiledTaskQuery {
        predicate: search_predicate(request, role_assignments, required_permissions, now),
        sort: TaskSort::compose(&request.sorting_parameters, TaskSort::task_default()),
    }
}

/// Compiles a summary search, which defaults to priority ordering.
#[must_use]
pub fn compile_summary_search(
    request: &SearchRequest,
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> CompiledTaskQuery {
    CompiledTaskQuery {
        predicate: search_predicate(request, role_assignments, required_permissions, now),
        sort: TaskSort::compose(&request.sorting_parameters, TaskSort::summary_default()),
    }
}

/// Compiles a lookup of one task by identifier.
#[must_use]
pub fn compile_single_task(
    task_id: &str,
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> TaskPredicate {
    TaskPredicate::and([
        TaskPredicate::equals(TaskField::TaskId, task_id),
        role_visibility(role_assignments, required_permissions, now),
    ])
}

/// Compiles the lookup of open tasks of the given types on one case.
///
/// An empty `task_types` list matches nothing.
#[must_use]
pub fn compile_completable(
    case_id: &str,
    task_types: &[String],
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> TaskPredicate {
    TaskPredicate::and([
        TaskPredicate::equals(TaskField::CaseId, case_id),
        TaskPredicate::is_in(
            TaskField::State,
            [TaskState::Assigned, TaskState::Unassigned].map(|state| state.as_str()),
        ),
        TaskPredicate::is_in(TaskField::TaskType, task_types.iter().cloned()),
        role_visibility(role_assignments, required_permissions, now),
    ])
}

/// Compiles the lookup of role rows that make a task visible, with no
/// permission gate.
#[must_use]
pub fn compile_role_permissions_lookup(
    task_id: &str,
    role_assignments: &[RoleAssignment],
    now: DateTime<Utc>,
) -> TaskPredicate {
    compile_single_task(task_id, role_assignments, &[], now)
}

/// Compiles role visibility gated by the required permissions.
///
/// Only active role assignments contribute. With none, the result never
/// matches.
#[must_use]
pub fn role_visibility(
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> TaskPredicate {
    let active_roles: Vec<&RoleAssignment> = role_assignments
        .iter()
        .filter(|role| is_active(role, now))
        .collect();

    TaskPredicate::and([
        grant_types::grant_type_predicate(&active_roles),
        permissions::permission_requirements(required_permissions),
    ])
}

/// Compiles the AND of every business filter dimension of a request.
#[must_use]
pub fn business_filters(request: &SearchRequest) -> TaskPredicate {
    TaskPredicate::and([
        field_filter(TaskField::Jurisdiction, &request.jurisdictions),
        field_filter(
            TaskField::State,
            request.states.iter().map(|state| state.as_str()),
        ),
        field_filter(TaskField::Location, &request.locations),
        field_filter(TaskField::Region, &request.regions),
        field_filter(TaskField::CaseId, &request.case_ids),
        field_filter(TaskField::Assignee, &request.users),
        field_filter(TaskField::WorkType, &request.work_types),
        field_filter(TaskField::RoleCategory, &request.role_categories),
        field_filter(TaskField::TaskType, &request.task_types),
        field_filter(TaskField::TaskId, &request.task_ids),
    ])
}

fn search_predicate(
    request: &SearchRequest,
    role_assignments: &[RoleAssignment],
    required_permissions: &[PermissionType],
    now: DateTime<Utc>,
) -> TaskPredicate {
    TaskPredicate::and([
        business_filters(request),
        role_visibility(role_assignments, required_permissions, now),
    ])
}
