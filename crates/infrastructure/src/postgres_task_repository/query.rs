use sqlx::{Postgres, QueryBuilder};
use taskgate_application::{TaskField, TaskPredicate, TaskQuery, TaskSort};
use taskgate_core::{AppError, AppResult};
use taskgate_domain::SortDirection;

const TASK_COLUMNS: &str = "t.task_id, t.task_name, t.task_type, t.state, t.jurisdiction, \
     t.region, t.location, t.location_name, t.case_id, t.case_type_id, t.case_name, \
     t.case_category, t.assignee, t.work_type, t.role_category, t.security_classification, \
     t.title, t.due_date_time, t.priority_date, t.major_priority, t.minor_priority, \
     t.next_hearing_date, t.created";

pub(super) const TASK_ROLE_COLUMNS: &str = "r.task_id, r.role_name, r.role_category, r.read, \
     r.own, r.execute, r.manage, r.cancel, r.refer, r.claim, r.assign, r.unassign, \
     r.complete, r.authorizations";

const TEXT_COLLATION: &str = " COLLATE \"C\"";

/// Lists distinct tasks with at least one role row satisfying the predicate.
pub(super) fn search_query(query: &TaskQuery) -> AppResult<QueryBuilder<'static, Postgres>> {
    let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT ");
    builder.push(TASK_COLUMNS);
    builder.push(
        " FROM tasks t WHERE EXISTS (SELECT 1 FROM task_roles r WHERE r.task_id = t.task_id AND ",
    );
    push_task_predicate(&mut builder, &query.predicate);
    builder.push(')');

    push_order_by(&mut builder, &query.sort);

    if let Some(page) = query.page {
        let limit = i64::try_from(page.limit()).map_err(|error| {
            AppError::Validation(format!("invalid task query limit: {error}"))
        })?;
        let offset = i64::try_from(page.offset()).map_err(|error| {
            AppError::Validation(format!("invalid task query offset: {error}"))
        })?;

        builder.push(" LIMIT ");
        builder.push_bind(limit);
        builder.push(" OFFSET ");
        builder.push_bind(offset);
    }

    Ok(builder)
}

/// Counts distinct task identifiers over the task/role join.
pub(super) fn count_query(predicate: &TaskPredicate) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new(
        "SELECT COUNT(DISTINCT t.task_id) FROM tasks t JOIN task_roles r ON r.task_id = t.task_id WHERE ",
    );
    push_task_predicate(&mut builder, predicate);
    builder
}

/// Lists the role rows that individually satisfy the predicate.
pub(super) fn matching_roles_query(predicate: &TaskPredicate) -> QueryBuilder<'static, Postgres> {
    let mut builder: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT ");
    builder.push(TASK_ROLE_COLUMNS);
    builder.push(" FROM tasks t JOIN task_roles r ON r.task_id = t.task_id WHERE ");
    push_task_predicate(&mut builder, predicate);
    builder.push(" ORDER BY r.task_id");
    builder.push(TEXT_COLLATION);
    builder.push(", r.role_name");
    builder.push(TEXT_COLLATION);
    builder
}

pub(super) fn push_task_predicate(
    builder: &mut QueryBuilder<'static, Postgres>,
    predicate: &TaskPredicate,
) {
    match predicate {
        TaskPredicate::Always => {
            builder.push("TRUE");
        }
        TaskPredicate::Never => {
            builder.push("FALSE");
        }
        TaskPredicate::And(nodes) => push_group(builder, nodes, " AND ", "TRUE"),
        TaskPredicate::Or(nodes) => push_group(builder, nodes, " OR ", "FALSE"),
        TaskPredicate::Equals { field, value } => {
            push_column(builder, *field);
            builder.push(" = ");
            builder.push_bind(value.clone());
        }
        TaskPredicate::In { field, values } => {
            push_column(builder, *field);
            builder.push(" = ANY(");
            builder.push_bind(values.clone());
            builder.push(')');
        }
        TaskPredicate::AuthorizationsEmpty => {
            builder.push("(r.authorizations IS NULL OR cardinality(r.authorizations) = 0)");
        }
        TaskPredicate::AuthorizationsOverlap(values) => {
            builder.push("r.authorizations && ");
            builder.push_bind(values.clone());
        }
        TaskPredicate::PermissionGranted(permission) => {
            builder.push("r.");
            builder.push(permission.as_str());
            builder.push(" = TRUE");
        }
    }
}

fn push_group(
    builder: &mut QueryBuilder<'static, Postgres>,
    nodes: &[TaskPredicate],
    separator: &str,
    empty: &str,
) {
    if nodes.is_empty() {
        builder.push(empty);
        return;
    }

    builder.push('(');
    for (index, node) in nodes.iter().enumerate() {
        if index > 0 {
            builder.push(separator);
        }
        push_task_predicate(builder, node);
    }
    builder.push(')');
}

fn push_column(builder: &mut QueryBuilder<'static, Postgres>, field: TaskField) {
    builder.push(if field.is_role_field() { "r." } else { "t." });
    builder.push(field.column());
}

fn push_order_by(builder: &mut QueryBuilder<'static, Postgres>, sort: &TaskSort) {
    builder.push(" ORDER BY ");
    for key in sort.keys() {
        builder.push("t.");
        builder.push(key.field.column());
        if key.field.is_text() {
            builder.push(TEXT_COLLATION);
        }
        match key.direction {
            SortDirection::Asc => builder.push(" ASC NULLS LAST, "),
            SortDirection::Desc => builder.push(" DESC NULLS LAST, "),
        };
    }
    builder.push("t.task_id");
    builder.push(TEXT_COLLATION);
    builder.push(" ASC");
}
