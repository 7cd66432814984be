use taskgate_application::{TaskField, TaskPredicate};
use taskgate_domain::{TaskRecord, TaskRolePermissions};

/// A task matches when any one of its role rows satisfies the predicate.
pub(super) fn task_matches(predicate: &TaskPredicate, task: &TaskRecord) -> bool {
    task.roles
        .iter()
        .any(|role| row_matches(predicate, task, role))
}

/// Evaluates the predicate against one (task, role row) pair.
///
/// Leaves over a missing optional column never match, mirroring SQL null
/// comparison.
pub(super) fn row_matches(
    predicate: &TaskPredicate,
    task: &TaskRecord,
    role: &TaskRolePermissions,
) -> bool {
    match predicate {
        TaskPredicate::Always => true,
        TaskPredicate::Never => false,
        TaskPredicate::And(nodes) => nodes.iter().all(|node| row_matches(node, task, role)),
        TaskPredicate::Or(nodes) => nodes.iter().any(|node| row_matches(node, task, role)),
        TaskPredicate::Equals { field, value } => {
            field_value(task, role, *field) == Some(value.as_str())
        }
        TaskPredicate::In { field, values } => field_value(task, role, *field)
            .is_some_and(|actual| values.iter().any(|candidate| candidate == actual)),
        TaskPredicate::AuthorizationsEmpty => role.has_no_authorizations(),
        TaskPredicate::AuthorizationsOverlap(values) => {
            role.authorizations.as_ref().is_some_and(|held| {
                held.iter()
                    .any(|authorization| values.contains(authorization))
            })
        }
        TaskPredicate::PermissionGranted(permission) => role.grants(*permission),
    }
}

fn field_value<'a>(
    task: &'a TaskRecord,
    role: &'a TaskRolePermissions,
    field: TaskField,
) -> Option<&'a str> {
    match field {
        TaskField::TaskId => Some(task.task_id.as_str()),
        TaskField::TaskType => Some(task.task_type.as_str()),
        TaskField::State => Some(task.state.as_str()),
        TaskField::Jurisdiction => Some(task.jurisdiction.as_str()),
        TaskField::Region => task.region.as_deref(),
        TaskField::Location => task.location.as_deref(),
        TaskField::CaseId => Some(task.case_id.as_str()),
        TaskField::CaseTypeId => Some(task.case_type_id.as_str()),
        TaskField::Assignee => task.assignee.as_deref(),
        TaskField::WorkType => task.work_type.as_deref(),
        TaskField::RoleCategory => task.role_category.as_deref(),
        TaskField::SecurityClassification => Some(task.security_classification.as_str()),
        TaskField::RoleName => Some(role.role_name.as_str()),
    }
}
