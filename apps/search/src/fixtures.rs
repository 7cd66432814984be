use std::path::Path;

use serde::de::DeserializeOwned;
use taskgate_core::{AppError, AppResult};
use taskgate_domain::{RoleAssignment, SearchRequest, SearchTaskRequest, TaskRecord};

pub async fn load_search_request(path: &Path) -> AppResult<SearchRequest> {
    let transport: SearchTaskRequest = read_json(path, "search request").await?;
    SearchRequest::try_from(transport)
}

pub async fn load_role_assignments(path: &Path) -> AppResult<Vec<RoleAssignment>> {
    read_json(path, "role assignments").await
}

pub async fn load_tasks(path: &Path) -> AppResult<Vec<TaskRecord>> {
    read_json(path, "task fixtures").await
}

async fn read_json<T: DeserializeOwned>(path: &Path, label: &str) -> AppResult<T> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|error| {
        AppError::Validation(format!(
            "failed to read {label} from '{}': {error}",
            path.display()
        ))
    })?;

    parse_json(contents.as_str(), label, path)
}

fn parse_json<T: DeserializeOwned>(contents: &str, label: &str, path: &Path) -> AppResult<T> {
    serde_json::from_str(contents).map_err(|error| {
        AppError::Validation(format!(
            "invalid {label} in '{}': {error}",
            path.display()
        ))
    })
}
