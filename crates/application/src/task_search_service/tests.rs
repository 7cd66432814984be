use std::sync::Arc;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use taskgate_core::{AppError, AppResult};
use taskgate_domain::{
    Classification, GrantType, PermissionType, RoleAssignment, RoleType, SearchRequest,
    TaskRecord, TaskRolePermissions, TaskState,
};
use tokio::sync::Mutex;

use crate::{FixedClock, OffsetPagination, TaskPredicate, TaskQuery, TaskRepository};

use super::TaskSearchService;

#[derive(Default)]
struct FakeTaskRepository {
    tasks: Vec<TaskRecord>,
    role_rows: Vec<TaskRolePermissions>,
    total: u64,
    searches: Mutex<Vec<TaskQuery>>,
    counts: Mutex<Vec<TaskPredicate>>,
}

#[async_trait]
impl TaskRepository for FakeTaskRepository {
    async fn search_tasks(&self, query: TaskQuery) -> AppResult<Vec<TaskRecord>> {
        self.searches.lock().await.push(query);
        Ok(self.tasks.clone())
    }

    async fn count_tasks(&self, predicate: &TaskPredicate) -> AppResult<u64> {
        self.counts.lock().await.push(predicate.clone());
        Ok(self.total)
    }

    async fn list_matching_task_roles(
        &self,
        predicate: &TaskPredicate,
    ) -> AppResult<Vec<TaskRolePermissions>> {
        self.counts.lock().await.push(predicate.clone());
        Ok(self.role_rows.clone())
    }
}

fn fixed_clock() -> Arc<FixedClock> {
    match Utc.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).single() {
        Some(instant) => Arc::new(FixedClock(instant)),
        None => panic!("fixed instant is valid"),
    }
}

fn service(repository: Arc<FakeTaskRepository>) -> TaskSearchService {
    TaskSearchService::new(repository, fixed_clock())
}

fn caseworker() -> RoleAssignment {
    RoleAssignment::new(
        "actor-1",
        "tribunal-caseworker",
        RoleType::Organisation,
        GrantType::Standard,
        Classification::Public,
    )
}

fn page(offset: i64, limit: i64) -> OffsetPagination {
    match OffsetPagination::new(offset, limit) {
        Ok(page) => page,
        Err(error) => panic!("valid page window: {error}"),
    }
}

fn ia_request() -> SearchRequest {
    SearchRequest {
        jurisdictions: vec!["IA".to_owned()],
        ..SearchRequest::default()
    }
}

fn ia_task(task_id: &str) -> TaskRecord {
    TaskRecord::new(
        task_id,
        "reviewAppeal",
        TaskState::Assigned,
        "IA",
        "1623278362431003",
        "Asylum",
    )
}

#[tokio::test]
async fn unconstrained_search_is_rejected_before_querying() {
    let repository = Arc::new(FakeTaskRepository::default());
    let service = service(repository.clone());

    let result = service
        .search_tasks(
            &SearchRequest::default(),
            &[caseworker()],
            &[PermissionType::Read],
            page(0, 25),
        )
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(repository.searches.lock().await.is_empty());
    assert!(repository.counts.lock().await.is_empty());
}

#[tokio::test]
async fn search_without_active_roles_skips_the_store() {
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![ia_task("task-1")],
        total: 1,
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());
    let FixedClock(now) = *fixed_clock();
    let expired = caseworker().with_validity(None, Some(now - Duration::days(1)));

    let result = service
        .search_tasks(&ia_request(), &[expired], &[PermissionType::Read], page(0, 25))
        .await;

    let Ok(result) = result else {
        panic!("search should succeed with an empty page");
    };
    assert!(result.tasks.is_empty());
    assert_eq!(result.total_records, 0);
    assert!(repository.searches.lock().await.is_empty());
}

#[tokio::test]
async fn search_counts_then_lists_with_the_page_window() {
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![ia_task("task-1"), ia_task("task-2")],
        total: 7,
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());

    let result = service
        .search_tasks(&ia_request(), &[caseworker()], &[PermissionType::Read], page(2, 2))
        .await;

    let Ok(result) = result else {
        panic!("search should succeed");
    };
    assert_eq!(result.total_records, 7);
    assert_eq!(result.tasks.len(), 2);

    let searches = repository.searches.lock().await;
    let counts = repository.counts.lock().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(counts.len(), 1);
    assert_eq!(searches[0].predicate, counts[0]);
    assert_eq!(searches[0].page, Some(page(2, 2)));
}

#[tokio::test]
async fn summary_search_projects_rows() {
    let mut task = ia_task("task-1");
    task.major_priority = Some(5000);
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![task],
        total: 1,
        ..FakeTaskRepository::default()
    });
    let service = service(repository);

    let result = service
        .search_task_summaries(&ia_request(), &[caseworker()], &[PermissionType::Read], page(0, 10))
        .await;

    let Ok(result) = result else {
        panic!("summary search should succeed");
    };
    assert_eq!(result.total_records, 1);
    assert_eq!(result.tasks.len(), 1);
    assert_eq!(result.tasks[0].task_id, "task-1");
    assert_eq!(result.tasks[0].major_priority, Some(5000));
}

#[tokio::test]
async fn get_task_reads_a_single_row_window() {
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![ia_task("task-1")],
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());

    let found = service
        .get_task("task-1", &[caseworker()], &[PermissionType::Read])
        .await;

    assert!(matches!(found, Ok(Some(ref task)) if task.task_id == "task-1"));
    let searches = repository.searches.lock().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].page, Some(page(0, 1)));
}

#[tokio::test]
async fn completable_tasks_require_own_and_execute() {
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![ia_task("task-1")],
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());

    let tasks = service
        .completable_tasks(
            "1623278362431003",
            &["reviewAppeal".to_owned()],
            &[caseworker()],
        )
        .await;

    assert!(matches!(tasks, Ok(ref tasks) if tasks.len() == 1));
    let searches = repository.searches.lock().await;
    assert_eq!(searches.len(), 1);
    assert_eq!(searches[0].page, None);

    let TaskPredicate::And(nodes) = &searches[0].predicate else {
        panic!("completable predicate should be a conjunction");
    };
    assert!(nodes.contains(&TaskPredicate::PermissionGranted(PermissionType::Own)));
    assert!(nodes.contains(&TaskPredicate::PermissionGranted(PermissionType::Execute)));
}

#[tokio::test]
async fn completable_tasks_without_types_return_nothing() {
    let repository = Arc::new(FakeTaskRepository {
        tasks: vec![ia_task("task-1")],
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());

    let tasks = service
        .completable_tasks("1623278362431003", &[], &[caseworker()])
        .await;

    assert!(matches!(tasks, Ok(ref tasks) if tasks.is_empty()));
    assert!(repository.searches.lock().await.is_empty());
}

#[tokio::test]
async fn role_permissions_lookup_has_no_permission_gate() {
    let repository = Arc::new(FakeTaskRepository {
        role_rows: vec![TaskRolePermissions::new("tribunal-caseworker")],
        ..FakeTaskRepository::default()
    });
    let service = service(repository.clone());

    let rows = service.task_role_permissions("task-1", &[caseworker()]).await;

    assert!(matches!(rows, Ok(ref rows) if rows.len() == 1));
    let lookups = repository.counts.lock().await;
    let Some(predicate) = lookups.first() else {
        panic!("lookup should reach the repository");
    };
    let TaskPredicate::And(nodes) = predicate else {
        panic!("lookup predicate should be a conjunction");
    };
    assert!(
        !nodes
            .iter()
            .any(|node| matches!(node, TaskPredicate::PermissionGranted(_)))
    );
}

#[test]
fn filter_signatures_delegate_to_request_dimensions() {
    let service = service(Arc::new(FakeTaskRepository::default()));
    let signatures = service.filter_signatures(&ia_request());

    assert_eq!(signatures.len(), 1);
    assert!(signatures.contains("*:IA:*:*:*:*"));
}
