use taskgate_domain::{RoleAssignment, RoleAttributeKey};

use crate::{TaskField, TaskPredicate};

const MANDATORY_ATTRIBUTES: &[(RoleAttributeKey, TaskField)] = &[
    (RoleAttributeKey::CaseType, TaskField::CaseTypeId),
    (RoleAttributeKey::Region, TaskField::Region),
    (RoleAttributeKey::Jurisdiction, TaskField::Jurisdiction),
    (RoleAttributeKey::BaseLocation, TaskField::Location),
    (RoleAttributeKey::CaseId, TaskField::CaseId),
];

/// ANDs the equality constraints of every scoped attribute on the role.
pub(super) fn mandatory_attribute_predicates(role: &RoleAssignment) -> TaskPredicate {
    TaskPredicate::and(
        MANDATORY_ATTRIBUTES
            .iter()
            .map(|(key, field)| attribute_equality(role, *key, *field)),
    )
}

/// Equality against the task field when the attribute is set, else always true.
pub(super) fn attribute_equality(
    role: &RoleAssignment,
    key: RoleAttributeKey,
    field: TaskField,
) -> TaskPredicate {
    role.attribute(key)
        .map(|value| TaskPredicate::equals(field, value))
        .unwrap_or(TaskPredicate::Always)
}
