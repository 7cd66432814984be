use std::cmp::Ordering;

use taskgate_domain::{SortDirection, SortField, SortingParameter, TaskRecord};
use tracing::debug;

/// One resolved sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortKey {
    /// Sorted field.
    pub field: SortField,
    /// Sort direction.
    pub direction: SortDirection,
}

impl SortKey {
    /// Creates a sort key.
    #[must_use]
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}

/// Ordered multi-key sort applied left to right, with a task-id tiebreak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSort {
    keys: Vec<SortKey>,
}

impl TaskSort {
    /// Creates a sort from resolved keys.
    #[must_use]
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Default order for full-task queries: due date, latest first.
    #[must_use]
    pub fn task_default() -> Self {
        Self::new(vec![SortKey::new(
            SortField::DueDateTime,
            SortDirection::Desc,
        )])
    }

    /// Default order for summary queries: priority tuple, ascending.
    #[must_use]
    pub fn summary_default() -> Self {
        Self::new(vec![
            SortKey::new(SortField::MajorPriority, SortDirection::Asc),
            SortKey::new(SortField::PriorityDate, SortDirection::Asc),
            SortKey::new(SortField::MinorPriority, SortDirection::Asc),
        ])
    }

    /// Composes caller sort instructions in order, dropping unresolvable ones.
    ///
    /// Falls back to `default` when no instruction resolves.
    #[must_use]
    pub fn compose(parameters: &[SortingParameter], default: Self) -> Self {
        let mut keys = Vec::with_capacity(parameters.len());
        for parameter in parameters {
            match parameter.resolve() {
                Some((field, direction)) => {
                    if keys.iter().any(|key: &SortKey| key.field == field) {
                        continue;
                    }
                    keys.push(SortKey::new(field, direction));
                }
                None => debug!(
                    sort_by = %parameter.sort_by,
                    sort_order = %parameter.sort_order,
                    "dropping unresolvable sort parameter"
                ),
            }
        }

        if keys.is_empty() {
            return default;
        }

        Self::new(keys)
    }

    /// Returns the sort keys in application order.
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Compares two tasks under this sort. Missing values sort last.
    ///
    /// Text compares byte by byte; the Postgres store matches this with
    /// `COLLATE "C"` on text sort columns.
    #[must_use]
    pub fn compare(&self, left: &TaskRecord, right: &TaskRecord) -> Ordering {
        for key in &self.keys {
            let ordering = match (left.sort_value(key.field), right.sort_value(key.field)) {
                (Some(left_value), Some(right_value)) => match key.direction {
                    SortDirection::Asc => left_value.cmp(&right_value),
                    SortDirection::Desc => right_value.cmp(&left_value),
                },
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            };

            if ordering != Ordering::Equal {
                return ordering;
            }
        }

        left.task_id.cmp(&right.task_id)
    }
}
