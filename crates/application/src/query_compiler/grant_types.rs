use taskgate_domain::{GrantType, GrantTypeFamily, RoleAssignment, RoleAttributeKey};

use super::attribute_constraints::{attribute_equality, mandatory_attribute_predicates};
use super::classification::classification_predicate;
use crate::{TaskField, TaskPredicate};

/// ORs the family predicates built from the active role assignments.
pub(super) fn grant_type_predicate(active_roles: &[&RoleAssignment]) -> TaskPredicate {
    TaskPredicate::or(GrantTypeFamily::all().iter().map(|family| {
        TaskPredicate::or(
            active_roles
                .iter()
                .filter(|role| role.grant_type.family() == *family)
                .map(|role| role_predicate(*family, role)),
        )
    }))
}

fn role_predicate(family: GrantTypeFamily, role: &RoleAssignment) -> TaskPredicate {
    match family {
        GrantTypeFamily::BasicOrSpecific => TaskPredicate::and([
            role_name_predicate(role),
            classification_predicate(role),
            mandatory_attribute_predicates(role),
            TaskPredicate::AuthorizationsEmpty,
        ]),
        GrantTypeFamily::StandardOrChallenged => TaskPredicate::and([
            role_name_predicate(role),
            classification_predicate(role),
            mandatory_attribute_predicates(role),
            authorizations_predicate(role),
        ]),
        GrantTypeFamily::Excluded => TaskPredicate::and([
            role_name_predicate(role),
            classification_predicate(role),
            attribute_equality(role, RoleAttributeKey::CaseId, TaskField::CaseId),
        ]),
    }
}

fn role_name_predicate(role: &RoleAssignment) -> TaskPredicate {
    TaskPredicate::equals(TaskField::RoleName, role.role_name.as_str())
}

// Challenged roles may also see rows whose authorisations they hold.
fn authorizations_predicate(role: &RoleAssignment) -> TaskPredicate {
    if role.grant_type != GrantType::Challenged {
        return TaskPredicate::AuthorizationsEmpty;
    }

    let authorisations = role.scoped_authorisations();
    if authorisations.is_empty() {
        return TaskPredicate::AuthorizationsEmpty;
    }

    TaskPredicate::or([
        TaskPredicate::AuthorizationsEmpty,
        TaskPredicate::AuthorizationsOverlap(authorisations),
    ])
}
