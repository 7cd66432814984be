use std::collections::BTreeSet;

use taskgate_domain::PermissionType;

use crate::TaskPredicate;

/// Requires every permission flag on the matched task-role row.
pub(super) fn permission_requirements(required_permissions: &[PermissionType]) -> TaskPredicate {
    let unique: BTreeSet<PermissionType> = required_permissions.iter().copied().collect();
    TaskPredicate::and(unique.into_iter().map(TaskPredicate::PermissionGranted))
}
