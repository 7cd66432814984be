use taskgate_domain::RoleAssignment;

use crate::{TaskField, TaskPredicate};

/// Restricts the task classification to the levels the role may see.
pub(super) fn classification_predicate(role: &RoleAssignment) -> TaskPredicate {
    TaskPredicate::is_in(
        TaskField::SecurityClassification,
        role.classification
            .visible_classifications()
            .iter()
            .map(|classification| classification.as_str()),
    )
}
