use chrono::{DateTime, Utc};
use taskgate_domain::RoleAssignment;

/// Returns whether a role assignment is active at `now`.
///
/// Bounds are exclusive. A missing begin time counts as started and a
/// missing end time as never ending.
#[must_use]
pub fn is_active(role: &RoleAssignment, now: DateTime<Utc>) -> bool {
    let started = role.begin_time.is_none_or(|begin_time| now > begin_time);
    let not_ended = role.end_time.is_none_or(|end_time| now < end_time);

    started && not_ended
}
