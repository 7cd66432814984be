use std::collections::HashMap;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use taskgate_application::{TaskPredicate, TaskQuery, TaskRepository};
use taskgate_core::{AppError, AppResult};
use taskgate_domain::{Classification, TaskRecord, TaskRolePermissions, TaskState};
use tracing::debug;

mod query;


/// PostgreSQL-backed task store over the `tasks` and `task_roles` tables.
#[derive(Clone)]
pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    /// Creates a repository with the provided connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts or replaces a task together with its role rows.
    pub async fn save_task(&self, task: &TaskRecord) -> AppResult<()> {
        let mut transaction = self.pool.begin().await.map_err(|error| {
            AppError::Internal(format!("failed to start task save transaction: {error}"))
        })?;

        sqlx::query(
            r#"
            INSERT INTO tasks (
                task_id, task_name, task_type, state, jurisdiction, region, location,
                location_name, case_id, case_type_id, case_name, case_category, assignee,
                work_type, role_category, security_classification, title, due_date_time,
                priority_date, major_priority, minor_priority, next_hearing_date, created
            )
            VALUES (
                $1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17,
                $18, $19, $20, $21, $22, $23
            )
            ON CONFLICT (task_id) DO UPDATE SET
                task_name = EXCLUDED.task_name,
                task_type = EXCLUDED.task_type,
                state = EXCLUDED.state,
                jurisdiction = EXCLUDED.jurisdiction,
                region = EXCLUDED.region,
                location = EXCLUDED.location,
                location_name = EXCLUDED.location_name,
                case_id = EXCLUDED.case_id,
                case_type_id = EXCLUDED.case_type_id,
                case_name = EXCLUDED.case_name,
                case_category = EXCLUDED.case_category,
                assignee = EXCLUDED.assignee,
                work_type = EXCLUDED.work_type,
                role_category = EXCLUDED.role_category,
                security_classification = EXCLUDED.security_classification,
                title = EXCLUDED.title,
                due_date_time = EXCLUDED.due_date_time,
                priority_date = EXCLUDED.priority_date,
                major_priority = EXCLUDED.major_priority,
                minor_priority = EXCLUDED.minor_priority,
                next_hearing_date = EXCLUDED.next_hearing_date,
                created = EXCLUDED.created
            "#,
        )
        .bind(task.task_id.as_str())
        .bind(task.task_name.as_str())
        .bind(task.task_type.as_str())
        .bind(task.state.as_str())
        .bind(task.jurisdiction.as_str())
        .bind(task.region.as_deref())
        .bind(task.location.as_deref())
        .bind(task.location_name.as_deref())
        .bind(task.case_id.as_str())
        .bind(task.case_type_id.as_str())
        .bind(task.case_name.as_deref())
        .bind(task.case_category.as_deref())
        .bind(task.assignee.as_deref())
        .bind(task.work_type.as_deref())
        .bind(task.role_category.as_deref())
        .bind(task.security_classification.as_str())
        .bind(task.title.as_deref())
        .bind(task.due_date_time)
        .bind(task.priority_date)
        .bind(task.major_priority)
        .bind(task.minor_priority)
        .bind(task.next_hearing_date)
        .bind(task.created)
        .execute(&mut *transaction)
        .await
        .map_err(|error| {
            AppError::Internal(format!("failed to save task '{}': {error}", task.task_id))
        })?;

        sqlx::query("DELETE FROM task_roles WHERE task_id = $1")
            .bind(task.task_id.as_str())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to clear role rows for task '{}': {error}",
                    task.task_id
                ))
            })?;

        for role in &task.roles {
            sqlx::query(
                r#"
                INSERT INTO task_roles (
                    task_id, role_name, role_category, read, own, execute, manage, cancel,
                    refer, claim, assign, unassign, complete, authorizations
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
                "#,
            )
            .bind(task.task_id.as_str())
            .bind(role.role_name.as_str())
            .bind(role.role_category.as_deref())
            .bind(role.read)
            .bind(role.own)
            .bind(role.execute)
            .bind(role.manage)
            .bind(role.cancel)
            .bind(role.refer)
            .bind(role.claim)
            .bind(role.assign)
            .bind(role.unassign)
            .bind(role.complete)
            .bind(role.authorizations.as_deref())
            .execute(&mut *transaction)
            .await
            .map_err(|error| {
                AppError::Internal(format!(
                    "failed to save role row '{}' for task '{}': {error}",
                    role.role_name, task.task_id
                ))
            })?;
        }

        transaction.commit().await.map_err(|error| {
            AppError::Internal(format!(
                "failed to commit task '{}': {error}",
                task.task_id
            ))
        })
    }

    async fn load_role_rows(
        &self,
        task_ids: &[String],
    ) -> AppResult<HashMap<String, Vec<TaskRolePermissions>>> {
        if task_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query_as::<_, TaskRoleRow>(&format!(
            "SELECT {} FROM task_roles r WHERE r.task_id = ANY($1) ORDER BY r.task_id, r.role_name",
            query::TASK_ROLE_COLUMNS
        ))
        .bind(task_ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to load task role rows: {error}")))?;

        let mut grouped: HashMap<String, Vec<TaskRolePermissions>> = HashMap::new();
        for row in rows {
            let (task_id, role) = row.into_parts();
            grouped.entry(task_id).or_default().push(role);
        }

        Ok(grouped)
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    task_id: String,
    task_name: String,
    task_type: String,
    state: String,
    jurisdiction: String,
    region: Option<String>,
    location: Option<String>,
    location_name: Option<String>,
    case_id: String,
    case_type_id: String,
    case_name: Option<String>,
    case_category: Option<String>,
    assignee: Option<String>,
    work_type: Option<String>,
    role_category: Option<String>,
    security_classification: String,
    title: Option<String>,
    due_date_time: Option<DateTime<Utc>>,
    priority_date: Option<DateTime<Utc>>,
    major_priority: Option<i32>,
    minor_priority: Option<i32>,
    next_hearing_date: Option<DateTime<Utc>>,
    created: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct TaskRoleRow {
    task_id: String,
    role_name: String,
    role_category: Option<String>,
    read: bool,
    own: bool,
    execute: bool,
    manage: bool,
    cancel: bool,
    refer: bool,
    claim: bool,
    assign: bool,
    unassign: bool,
    complete: bool,
    authorizations: Option<Vec<String>>,
}

impl TaskRoleRow {
    fn into_parts(self) -> (String, TaskRolePermissions) {
        (
            self.task_id,
            TaskRolePermissions {
                role_name: self.role_name,
                role_category: self.role_category,
                read: self.read,
                own: self.own,
                execute: self.execute,
                manage: self.manage,
                cancel: self.cancel,
                refer: self.refer,
                claim: self.claim,
                assign: self.assign,
                unassign: self.unassign,
                complete: self.complete,
                authorizations: self.authorizations,
            },
        )
    }
}

fn task_from_row(row: TaskRow, roles: Vec<TaskRolePermissions>) -> AppResult<TaskRecord> {
    let state = TaskState::from_str(row.state.as_str()).map_err(|error| {
        AppError::Internal(format!(
            "task '{}' has an invalid stored state: {error}",
            row.task_id
        ))
    })?;
    let security_classification = Classification::from_str(row.security_classification.as_str())
        .map_err(|error| {
            AppError::Internal(format!(
                "task '{}' has an invalid stored classification: {error}",
                row.task_id
            ))
        })?;

    Ok(TaskRecord {
        task_id: row.task_id,
        task_name: row.task_name,
        task_type: row.task_type,
        state,
        jurisdiction: row.jurisdiction,
        region: row.region,
        location: row.location,
        location_name: row.location_name,
        case_id: row.case_id,
        case_type_id: row.case_type_id,
        case_name: row.case_name,
        case_category: row.case_category,
        assignee: row.assignee,
        work_type: row.work_type,
        role_category: row.role_category,
        security_classification,
        title: row.title,
        due_date_time: row.due_date_time,
        priority_date: row.priority_date,
        major_priority: row.major_priority,
        minor_priority: row.minor_priority,
        next_hearing_date: row.next_hearing_date,
        created: row.created,
        roles,
    })
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn search_tasks(&self, task_query: TaskQuery) -> AppResult<Vec<TaskRecord>> {
        let mut builder = query::search_query(&task_query)?;
        debug!(sql = builder.sql(), "searching tasks");

        let rows = builder
            .build_query_as::<TaskRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to search tasks: {error}")))?;

        let task_ids: Vec<String> = rows.iter().map(|row| row.task_id.clone()).collect();
        let mut role_rows = self.load_role_rows(&task_ids).await?;

        rows.into_iter()
            .map(|row| {
                let roles = role_rows.remove(&row.task_id).unwrap_or_default();
                task_from_row(row, roles)
            })
            .collect()
    }

    async fn count_tasks(&self, predicate: &TaskPredicate) -> AppResult<u64> {
        let mut builder = query::count_query(predicate);

        let total: i64 = builder
            .build_query_scalar::<i64>()
            .fetch_one(&self.pool)
            .await
            .map_err(|error| AppError::Internal(format!("failed to count tasks: {error}")))?;

        u64::try_from(total)
            .map_err(|error| AppError::Internal(format!("invalid task count {total}: {error}")))
    }

    async fn list_matching_task_roles(
        &self,
        predicate: &TaskPredicate,
    ) -> AppResult<Vec<TaskRolePermissions>> {
        let mut builder = query::matching_roles_query(predicate);

        let rows = builder
            .build_query_as::<TaskRoleRow>()
            .fetch_all(&self.pool)
            .await
            .map_err(|error| {
                AppError::Internal(format!("failed to list matching task roles: {error}"))
            })?;

        Ok(rows.into_iter().map(|row| row.into_parts().1).collect())
    }
}
