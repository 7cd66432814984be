use chrono::{DateTime, Duration, TimeZone, Utc};
use taskgate_domain::{
    Classification, GrantType, PermissionType, RoleAssignment, RoleAttributeKey, RoleType,
    SearchRequest, SortDirection, SortField, SortingParameter, TaskState,
};

use super::{
    business_filters, compile_completable, compile_role_permissions_lookup, compile_search,
    compile_single_task, compile_summary_search, field_filter, is_active, role_visibility,
};
use crate::{SortKey, TaskField, TaskPredicate, TaskSort};

fn now() -> DateTime<Utc> {
    match Utc.with_ymd_and_hms(2026, 10, 16, 12, 0, 0).single() {
        Some(instant) => instant,
        None => panic!("fixed instant is valid"),
    }
}

fn role(grant_type: GrantType, classification: Classification) -> RoleAssignment {
    RoleAssignment::new(
        "actor-1",
        "tribunal-caseworker",
        RoleType::Organisation,
        grant_type,
        classification,
    )
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

fn classification_leaf(values: &[&str]) -> TaskPredicate {
    TaskPredicate::In {
        field: TaskField::SecurityClassification,
        values: strings(values),
    }
}

#[test]
fn validity_bounds_are_exclusive_and_optional() {
    let now = now();
    let unbounded = role(GrantType::Standard, Classification::Public);
    assert!(is_active(&unbounded, now));

    let started = unbounded
        .clone()
        .with_validity(Some(now - Duration::hours(1)), Some(now + Duration::hours(1)));
    assert!(is_active(&started, now));

    let begins_now = unbounded.clone().with_validity(Some(now), None);
    assert!(!is_active(&begins_now, now));

    let ends_now = unbounded.clone().with_validity(None, Some(now));
    assert!(!is_active(&ends_now, now));

    let not_yet = unbounded.clone().with_validity(Some(now + Duration::days(1)), None);
    assert!(!is_active(&not_yet, now));

    let inverted = unbounded.with_validity(
        Some(now + Duration::hours(1)),
        Some(now - Duration::hours(1)),
    );
    assert!(!is_active(&inverted, now));
}

#[test]
fn expired_role_is_equivalent_to_no_role() {
    let now = now();
    let expired = role(GrantType::Standard, Classification::Restricted)
        .with_validity(None, Some(now - Duration::seconds(1)));

    assert_eq!(
        role_visibility(&[expired], &[PermissionType::Read], now),
        role_visibility(&[], &[PermissionType::Read], now)
    );
    assert!(role_visibility(&[], &[PermissionType::Read], now).is_never());
}

#[test]
fn classification_levels_compile_to_visible_sets() {
    let now = now();
    let cases = [
        (
            Classification::Restricted,
            classification_leaf(&["RESTRICTED", "PRIVATE", "PUBLIC"]),
        ),
        (
            Classification::Private,
            classification_leaf(&["PRIVATE", "PUBLIC"]),
        ),
        (Classification::Public, classification_leaf(&["PUBLIC"])),
    ];

    for (classification, expected_leaf) in cases {
        let compiled = role_visibility(&[role(GrantType::Basic, classification)], &[], now);
        let TaskPredicate::And(nodes) = compiled else {
            panic!("expected a conjunction for one basic role");
        };
        assert!(nodes.contains(&expected_leaf));
    }
}

#[test]
fn basic_role_requires_role_name_attributes_and_empty_authorizations() {
    let now = now();
    let specific = role(GrantType::Specific, Classification::Public)
        .with_attribute(RoleAttributeKey::Jurisdiction, "IA")
        .with_attribute(RoleAttributeKey::CaseId, "1623278362431003");

    assert_eq!(
        role_visibility(&[specific], &[PermissionType::Read], now),
        TaskPredicate::And(vec![
            TaskPredicate::equals(TaskField::RoleName, "tribunal-caseworker"),
            classification_leaf(&["PUBLIC"]),
            TaskPredicate::equals(TaskField::Jurisdiction, "IA"),
            TaskPredicate::equals(TaskField::CaseId, "1623278362431003"),
            TaskPredicate::AuthorizationsEmpty,
            TaskPredicate::PermissionGranted(PermissionType::Read),
        ])
    );
}

#[test]
fn challenged_role_accepts_empty_or_overlapping_authorizations() {
    let now = now();
    let challenged = role(GrantType::Challenged, Classification::Public)
        .with_authorisations(["SCSS"]);

    let compiled = role_visibility(&[challenged], &[], now);
    let TaskPredicate::And(nodes) = compiled else {
        panic!("expected a conjunction for one challenged role");
    };

    assert!(nodes.contains(&TaskPredicate::Or(vec![
        TaskPredicate::AuthorizationsEmpty,
        TaskPredicate::AuthorizationsOverlap(strings(&["SCSS"])),
    ])));
}

#[test]
fn standard_role_ignores_its_authorisations() {
    let now = now();
    let standard = role(GrantType::Standard, Classification::Public)
        .with_authorisations(["SCSS"]);

    let compiled = role_visibility(&[standard], &[], now);
    let TaskPredicate::And(nodes) = compiled else {
        panic!("expected a conjunction for one standard role");
    };

    assert!(nodes.contains(&TaskPredicate::AuthorizationsEmpty));
    assert!(
        !nodes
            .iter()
            .any(|node| matches!(node, TaskPredicate::Or(_)))
    );
}

#[test]
fn excluded_role_only_constrains_case_and_classification() {
    let now = now();
    let excluded = role(GrantType::Excluded, Classification::Private)
        .with_attribute(RoleAttributeKey::Jurisdiction, "IA")
        .with_attribute(RoleAttributeKey::CaseId, "1623278362431003");

    assert_eq!(
        role_visibility(&[excluded], &[], now),
        TaskPredicate::And(vec![
            TaskPredicate::equals(TaskField::RoleName, "tribunal-caseworker"),
            classification_leaf(&["PRIVATE", "PUBLIC"]),
            TaskPredicate::equals(TaskField::CaseId, "1623278362431003"),
        ])
    );
}

#[test]
fn roles_of_every_family_are_ored() {
    let now = now();
    let roles = [
        role(GrantType::Basic, Classification::Public),
        role(GrantType::Standard, Classification::Public),
        role(GrantType::Excluded, Classification::Public),
    ];

    let compiled = role_visibility(&roles, &[], now);
    let TaskPredicate::Or(family_predicates) = compiled else {
        panic!("expected a disjunction across families");
    };
    assert_eq!(family_predicates.len(), 3);
}

#[test]
fn required_permissions_are_deduplicated_and_anded() {
    let now = now();
    let compiled = role_visibility(
        &[role(GrantType::Excluded, Classification::Public)],
        &[
            PermissionType::Own,
            PermissionType::Execute,
            PermissionType::Own,
        ],
        now,
    );

    let TaskPredicate::And(nodes) = compiled else {
        panic!("expected a conjunction");
    };
    let permission_leaves: Vec<&TaskPredicate> = nodes
        .iter()
        .filter(|node| matches!(node, TaskPredicate::PermissionGranted(_)))
        .collect();
    assert_eq!(
        permission_leaves,
        vec![
            &TaskPredicate::PermissionGranted(PermissionType::Own),
            &TaskPredicate::PermissionGranted(PermissionType::Execute),
        ]
    );
}

#[test]
fn field_filter_arity_decides_leaf_shape() {
    assert_eq!(
        field_filter(TaskField::CaseId, Vec::<String>::new()),
        TaskPredicate::Always
    );
    assert_eq!(
        field_filter(TaskField::CaseId, ["123"]),
        TaskPredicate::equals(TaskField::CaseId, "123")
    );
    assert_eq!(
        field_filter(TaskField::CaseId, ["123", "456"]),
        TaskPredicate::In {
            field: TaskField::CaseId,
            values: strings(&["123", "456"]),
        }
    );
}

#[test]
fn business_filters_cover_every_dimension() {
    let request = SearchRequest {
        jurisdictions: strings(&["IA"]),
        states: vec![TaskState::Assigned, TaskState::Unassigned],
        users: strings(&["user-1"]),
        task_ids: strings(&["task-1", "task-2"]),
        ..SearchRequest::default()
    };

    assert_eq!(
        business_filters(&request),
        TaskPredicate::And(vec![
            TaskPredicate::equals(TaskField::Jurisdiction, "IA"),
            TaskPredicate::In {
                field: TaskField::State,
                values: strings(&["ASSIGNED", "UNASSIGNED"]),
            },
            TaskPredicate::equals(TaskField::Assignee, "user-1"),
            TaskPredicate::In {
                field: TaskField::TaskId,
                values: strings(&["task-1", "task-2"]),
            },
        ])
    );
}

#[test]
fn search_without_active_roles_never_matches() {
    let request = SearchRequest {
        jurisdictions: strings(&["IA"]),
        ..SearchRequest::default()
    };

    let compiled = compile_search(&request, &[], &[PermissionType::Read], now());
    assert!(compiled.predicate.is_never());
}

#[test]
fn search_and_summary_defaults_differ() {
    let request = SearchRequest {
        jurisdictions: strings(&["IA"]),
        ..SearchRequest::default()
    };
    let roles = [role(GrantType::Standard, Classification::Public)];

    let full = compile_search(&request, &roles, &[PermissionType::Read], now());
    let summary = compile_summary_search(&request, &roles, &[PermissionType::Read], now());

    assert_eq!(full.predicate, summary.predicate);
    assert_eq!(full.sort, TaskSort::task_default());
    assert_eq!(summary.sort, TaskSort::summary_default());
}

#[test]
fn explicit_sorting_overrides_defaults() {
    let request = SearchRequest {
        jurisdictions: strings(&["IA"]),
        sorting_parameters: vec![
            SortingParameter::new("caseName", "asc"),
            SortingParameter::new("unknownField", "desc"),
            SortingParameter::new("dueDate", "desc"),
        ],
        ..SearchRequest::default()
    };
    let roles = [role(GrantType::Standard, Classification::Public)];

    let compiled = compile_summary_search(&request, &roles, &[], now());
    assert_eq!(
        compiled.sort.keys(),
        &[
            SortKey::new(SortField::CaseName, SortDirection::Asc),
            SortKey::new(SortField::DueDateTime, SortDirection::Desc),
        ]
    );
}

#[test]
fn single_task_and_role_lookup_pin_task_id() {
    let roles = [role(GrantType::Standard, Classification::Public)];

    let single = compile_single_task("task-1", &roles, &[PermissionType::Read], now());
    let lookup = compile_role_permissions_lookup("task-1", &roles, now());

    let TaskPredicate::And(single_nodes) = single else {
        panic!("expected a conjunction");
    };
    let TaskPredicate::And(lookup_nodes) = lookup else {
        panic!("expected a conjunction");
    };

    assert_eq!(
        single_nodes.first(),
        Some(&TaskPredicate::equals(TaskField::TaskId, "task-1"))
    );
    assert!(single_nodes.contains(&TaskPredicate::PermissionGranted(PermissionType::Read)));
    assert!(
        !lookup_nodes
            .iter()
            .any(|node| matches!(node, TaskPredicate::PermissionGranted(_)))
    );
}

#[test]
fn completable_restricts_case_state_and_task_type() {
    let roles = [role(GrantType::Standard, Classification::Public)];
    let compiled = compile_completable(
        "123",
        &strings(&["reviewAppeal"]),
        &roles,
        &[PermissionType::Own, PermissionType::Execute],
        now(),
    );

    let TaskPredicate::And(nodes) = compiled else {
        panic!("expected a conjunction");
    };
    assert_eq!(
        &nodes[..3],
        &[
            TaskPredicate::equals(TaskField::CaseId, "123"),
            TaskPredicate::In {
                field: TaskField::State,
                values: strings(&["ASSIGNED", "UNASSIGNED"]),
            },
            TaskPredicate::In {
                field: TaskField::TaskType,
                values: strings(&["reviewAppeal"]),
            },
        ]
    );
}

#[test]
fn completable_without_task_types_never_matches() {
    let roles = [role(GrantType::Standard, Classification::Public)];
    let compiled = compile_completable("123", &[], &roles, &[PermissionType::Own], now());
    assert!(compiled.is_never());
}
