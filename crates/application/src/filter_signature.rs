//! Canonical cache-key signatures for search requests.
//!
//! A signature is `state:jurisdiction:role_category:work_type:region:location`
//! with abbreviated values and `*` for an unconstrained dimension. The
//! signature set of a request is the Cartesian product of its dimensions.

use std::collections::BTreeSet;

use taskgate_domain::{SearchRequest, TaskState};

const WILDCARD: &str = "*";
const SEPARATOR: &str = ":";

/// Builds the signature set of a search request.
///
/// The result does not depend on the order of filter values.
#[must_use]
pub fn build_filter_signatures(request: &SearchRequest) -> BTreeSet<String> {
    let dimensions = [
        dimension(request.states.iter().filter_map(abbreviate_state)),
        dimension(request.jurisdictions.iter().map(String::as_str)),
        dimension(
            request
                .role_categories
                .iter()
                .map(|value| abbreviate_role_category(value.as_str())),
        ),
        dimension(request.work_types.iter().map(String::as_str)),
        dimension(request.regions.iter().map(String::as_str)),
        dimension(request.locations.iter().map(String::as_str)),
    ];

    dimensions
        .iter()
        .fold(vec![String::new()], |prefixes, values| {
            prefixes
                .iter()
                .flat_map(|prefix| {
                    values.iter().map(move |value| {
                        if prefix.is_empty() {
                            value.clone()
                        } else {
                            format!("{prefix}{SEPARATOR}{value}")
                        }
                    })
                })
                .collect()
        })
        .into_iter()
        .collect()
}

fn dimension<'a>(values: impl Iterator<Item = &'a str>) -> BTreeSet<String> {
    let values: BTreeSet<String> = values
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
        .collect();

    if values.is_empty() {
        return BTreeSet::from([WILDCARD.to_owned()]);
    }

    values
}

fn abbreviate_state(state: &TaskState) -> Option<&'static str> {
    match state {
        TaskState::Assigned => Some("A"),
        TaskState::Unassigned => Some("U"),
        _ => None,
    }
}

fn abbreviate_role_category(role_category: &str) -> &str {
    match role_category {
        "JUDICIAL" => "J",
        "LEGAL_OPERATIONS" => "L",
        "ADMIN" => "A",
        "UNKNOWN" => "U",
        other => other,
    }
}
