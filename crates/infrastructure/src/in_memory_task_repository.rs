use std::collections::HashMap;

use async_trait::async_trait;
use taskgate_application::{TaskPredicate, TaskQuery, TaskRepository};
use taskgate_core::AppResult;
use taskgate_domain::{TaskRecord, TaskRolePermissions};
use tokio::sync::RwLock;

mod evaluate;


use evaluate::task_matches;

/// In-memory task store keyed by task identifier.
#[derive(Debug, Default)]
pub struct InMemoryTaskRepository {
    tasks: RwLock<HashMap<String, TaskRecord>>,
}

impl InMemoryTaskRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tasks: RwLock::new(HashMap::new()),
        }
    }

    /// Creates a repository seeded with tasks; later duplicates replace earlier ones.
    #[must_use]
    pub fn from_tasks(tasks: impl IntoIterator<Item = TaskRecord>) -> Self {
        Self {
            tasks: RwLock::new(
                tasks
                    .into_iter()
                    .map(|task| (task.task_id.clone(), task))
                    .collect(),
            ),
        }
    }

    /// Inserts or replaces a task.
    pub async fn insert_task(&self, task: TaskRecord) {
        self.tasks.write().await.insert(task.task_id.clone(), task);
    }
}

#[async_trait]
impl TaskRepository for InMemoryTaskRepository {
    async fn search_tasks(&self, query: TaskQuery) -> AppResult<Vec<TaskRecord>> {
        let tasks = self.tasks.read().await;

        let mut listed: Vec<&TaskRecord> = tasks
            .values()
            .filter(|task| task_matches(&query.predicate, task))
            .collect();
        listed.sort_by(|left, right| query.sort.compare(left, right));

        let Some(page) = query.page else {
            return Ok(listed.into_iter().cloned().collect());
        };

        Ok(listed
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect())
    }

    async fn count_tasks(&self, predicate: &TaskPredicate) -> AppResult<u64> {
        let tasks = self.tasks.read().await;
        let matched = tasks
            .values()
            .filter(|task| task_matches(predicate, task))
            .count();

        Ok(u64::try_from(matched).unwrap_or(u64::MAX))
    }

    async fn list_matching_task_roles(
        &self,
        predicate: &TaskPredicate,
    ) -> AppResult<Vec<TaskRolePermissions>> {
        let tasks = self.tasks.read().await;

        let mut matched: Vec<&TaskRecord> = tasks.values().collect();
        matched.sort_by(|left, right| left.task_id.cmp(&right.task_id));

        Ok(matched
            .into_iter()
            .flat_map(|task| {
                task.roles
                    .iter()
                    .filter(|role| evaluate::row_matches(predicate, task, role))
                    .cloned()
            })
            .collect())
    }
}
