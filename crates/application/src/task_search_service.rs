use std::collections::BTreeSet;
use std::sync::Arc;

use serde::Serialize;
use taskgate_core::AppResult;
use taskgate_domain::{
    PermissionType, RoleAssignment, SearchRequest, TaskRecord, TaskRolePermissions, TaskSummary,
};
use tracing::{debug, info, warn};

use crate::query_compiler::{
    CompiledTaskQuery, compile_completable, compile_role_permissions_lookup, compile_search,
    compile_single_task, compile_summary_search,
};
use crate::{
    Clock, OffsetPagination, TaskPredicate, TaskQuery, TaskRepository, TaskSort,
    build_filter_signatures,
};

#[cfg(test)]
mod tests;

/// Permissions a caller needs on a task to complete it.
pub const COMPLETABLE_PERMISSIONS: &[PermissionType] =
    &[PermissionType::Own, PermissionType::Execute];

/// One page of full task rows plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSearchResult {
    /// Tasks on the requested page.
    pub tasks: Vec<TaskRecord>,
    /// Distinct tasks matching the search.
    pub total_records: u64,
}

/// One page of task summaries plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskSummarySearchResult {
    /// Summaries on the requested page.
    pub tasks: Vec<TaskSummary>,
    /// Distinct tasks matching the search.
    pub total_records: u64,
}

/// Application service for role-scoped task search.
#[derive(Clone)]
pub struct TaskSearchService {
    repository: Arc<dyn TaskRepository>,
    clock: Arc<dyn Clock>,
}

impl TaskSearchService {
    /// Creates a new task search service.
    #[must_use]
    pub fn new(repository: Arc<dyn TaskRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    /// Searches full task rows visible to the caller.
    pub async fn search_tasks(
        &self,
        request: &SearchRequest,
        role_assignments: &[RoleAssignment],
        required_permissions: &[PermissionType],
        page: OffsetPagination,
    ) -> AppResult<TaskSearchResult> {
        Self::validate_request(request)?;
        let compiled = compile_search(
            request,
            role_assignments,
            required_permissions,
            self.clock.now(),
        );

        let (tasks, total_records) = self.run_paged_query(compiled, page).await?;
        info!(
            returned = tasks.len(),
            total_records,
            page_number = page.page_number(),
            "task search completed"
        );

        Ok(TaskSearchResult {
            tasks,
            total_records,
        })
    }

    /// Searches task summaries visible to the caller, ordered by priority
    /// unless the request sorts otherwise.
    pub async fn search_task_summaries(
        &self,
        request: &SearchRequest,
        role_assignments: &[RoleAssignment],
        required_permissions: &[PermissionType],
        page: OffsetPagination,
    ) -> AppResult<TaskSummarySearchResult> {
        Self::validate_request(request)?;
        let compiled = compile_summary_search(
            request,
            role_assignments,
            required_permissions,
            self.clock.now(),
        );

        let (tasks, total_records) = self.run_paged_query(compiled, page).await?;
        info!(
            returned = tasks.len(),
            total_records,
            page_number = page.page_number(),
            "task summary search completed"
        );

        Ok(TaskSummarySearchResult {
            tasks: tasks.iter().map(TaskSummary::from).collect(),
            total_records,
        })
    }

    /// Returns one task when the caller may see it with the permissions.
    pub async fn get_task(
        &self,
        task_id: &str,
        role_assignments: &[RoleAssignment],
        required_permissions: &[PermissionType],
    ) -> AppResult<Option<TaskRecord>> {
        let predicate = compile_single_task(
            task_id,
            role_assignments,
            required_permissions,
            self.clock.now(),
        );
        if predicate.is_never() {
            debug!(task_id, "no active role can see the task");
            return Ok(None);
        }

        let tasks = self
            .repository
            .search_tasks(TaskQuery {
                predicate,
                sort: TaskSort::task_default(),
                page: Some(OffsetPagination::new(0, 1)?),
            })
            .await?;

        Ok(tasks.into_iter().next())
    }

    /// Lists open tasks of the given types on a case that the caller may
    /// own and execute.
    pub async fn completable_tasks(
        &self,
        case_id: &str,
        task_types: &[String],
        role_assignments: &[RoleAssignment],
    ) -> AppResult<Vec<TaskRecord>> {
        let predicate = compile_completable(
            case_id,
            task_types,
            role_assignments,
            COMPLETABLE_PERMISSIONS,
            self.clock.now(),
        );
        if predicate.is_never() {
            return Ok(Vec::new());
        }

        let tasks = self
            .repository
            .search_tasks(TaskQuery {
                predicate,
                sort: TaskSort::task_default(),
                page: None,
            })
            .await?;
        debug!(case_id, matched = tasks.len(), "completable tasks resolved");

        Ok(tasks)
    }

    /// Lists the task role rows through which the caller sees a task.
    pub async fn task_role_permissions(
        &self,
        task_id: &str,
        role_assignments: &[RoleAssignment],
    ) -> AppResult<Vec<TaskRolePermissions>> {
        let predicate =
            compile_role_permissions_lookup(task_id, role_assignments, self.clock.now());
        if predicate.is_never() {
            return Ok(Vec::new());
        }

        self.repository.list_matching_task_roles(&predicate).await
    }

    /// Returns the cache-key signatures of a search request.
    #[must_use]
    pub fn filter_signatures(&self, request: &SearchRequest) -> BTreeSet<String> {
        build_filter_signatures(request)
    }

    fn validate_request(request: &SearchRequest) -> AppResult<()> {
        request.ensure_has_filters().inspect_err(|error| {
            warn!(error = %error, "rejected unconstrained task search");
        })
    }

    async fn run_paged_query(
        &self,
        compiled: CompiledTaskQuery,
        page: OffsetPagination,
    ) -> AppResult<(Vec<TaskRecord>, u64)> {
        if compiled.predicate == TaskPredicate::Never {
            debug!("no active role assignment grants visibility");
            return Ok((Vec::new(), 0));
        }

        debug!(predicate = ?compiled.predicate, sort = ?compiled.sort, "compiled task query");
        let total_records = self.repository.count_tasks(&compiled.predicate).await?;
        let tasks = self
            .repository
            .search_tasks(TaskQuery {
                predicate: compiled.predicate,
                sort: compiled.sort,
                page: Some(page),
            })
            .await?;

        Ok((tasks, total_records))
    }
}
