use async_trait::async_trait;
use taskgate_core::AppResult;
use taskgate_domain::{TaskRecord, TaskRolePermissions};

use crate::{OffsetPagination, TaskPredicate, TaskSort};

/// Query inputs for listing task rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskQuery {
    /// Compiled row filter.
    pub predicate: TaskPredicate,
    /// Sort order.
    pub sort: TaskSort,
    /// Page window; `None` returns every match.
    pub page: Option<OffsetPagination>,
}

/// Repository port for executing compiled task predicates.
///
/// A task matches when at least one of its role rows satisfies the
/// predicate; implementations must not return a task twice.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Lists matching tasks with all of their role rows.
    async fn search_tasks(&self, query: TaskQuery) -> AppResult<Vec<TaskRecord>>;

    /// Counts distinct matching task identifiers.
    async fn count_tasks(&self, predicate: &TaskPredicate) -> AppResult<u64>;

    /// Lists the role rows that individually satisfy the predicate.
    async fn list_matching_task_roles(
        &self,
        predicate: &TaskPredicate,
    ) -> AppResult<Vec<TaskRolePermissions>>;
}
