use crate::{TaskField, TaskPredicate};

/// Builds the predicate for one business search dimension.
///
/// No values leave the dimension unconstrained, one value compiles to an
/// equality and several to a membership test.
#[must_use]
pub fn field_filter<I, S>(field: TaskField, values: I) -> TaskPredicate
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut values: Vec<String> = values
        .into_iter()
        .map(|value| value.as_ref().to_owned())
        .collect();

    match values.len() {
        0 => TaskPredicate::Always,
        1 => values
            .pop()
            .map(|value| TaskPredicate::equals(field, value))
            .unwrap_or(TaskPredicate::Always),
        _ => TaskPredicate::In { field, values },
    }
}
