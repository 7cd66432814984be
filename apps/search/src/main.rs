//! Role-scoped task search runner.

#![forbid(unsafe_code)]

mod fixtures;
mod search_config;

use std::collections::BTreeSet;
use std::env;
use std::sync::Arc;

use serde::Serialize;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use taskgate_application::{OffsetPagination, SystemClock, TaskRepository, TaskSearchService};
use taskgate_core::{AppError, AppResult};
use taskgate_infrastructure::{InMemoryTaskRepository, PostgresTaskRepository};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::search_config::{SearchConfig, SearchView, TaskStoreConfig, required_env};

#[derive(Debug, Serialize)]
struct SearchOutput<T: Serialize> {
    #[serde(flatten)]
    result: T,
    filter_signatures: BTreeSet<String>,
}

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    if env::args().nth(1).as_deref() == Some("migrate") {
        let pool = connect_pool(required_env("DATABASE_URL")?.as_str()).await?;
        run_migrations(&pool).await?;
        info!("database migrations applied successfully");
        return Ok(());
    }

    let config = SearchConfig::load()?;
    let repository = build_repository(&config.store).await?;
    let service = TaskSearchService::new(repository, Arc::new(SystemClock));

    let request = fixtures::load_search_request(&config.search_request_path).await?;
    let role_assignments =
        fixtures::load_role_assignments(&config.role_assignments_path).await?;
    let page = OffsetPagination::new(config.offset, config.limit)?;
    let filter_signatures = service.filter_signatures(&request);

    let rendered = match config.view {
        SearchView::Tasks => {
            let result = service
                .search_tasks(&request, &role_assignments, &config.permissions, page)
                .await?;
            render(&SearchOutput {
                result,
                filter_signatures,
            })?
        }
        SearchView::Summaries => {
            let result = service
                .search_task_summaries(&request, &role_assignments, &config.permissions, page)
                .await?;
            render(&SearchOutput {
                result,
                filter_signatures,
            })?
        }
    };

    println!("{rendered}");
    Ok(())
}

async fn build_repository(store: &TaskStoreConfig) -> AppResult<Arc<dyn TaskRepository>> {
    match store {
        TaskStoreConfig::Memory { fixture_path } => {
            let tasks = match fixture_path {
                Some(path) => fixtures::load_tasks(path).await?,
                None => Vec::new(),
            };
            info!(tasks = tasks.len(), "using in-memory task store");
            Ok(Arc::new(InMemoryTaskRepository::from_tasks(tasks)))
        }
        TaskStoreConfig::Postgres { database_url } => {
            let pool = connect_pool(database_url.as_str()).await?;
            run_migrations(&pool).await?;
            info!("using postgres task store");
            Ok(Arc::new(PostgresTaskRepository::new(pool)))
        }
    }
}

async fn connect_pool(database_url: &str) -> AppResult<PgPool> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))
}

async fn run_migrations(pool: &PgPool) -> AppResult<()> {
    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))
}

fn render<T: Serialize>(output: &T) -> AppResult<String> {
    serde_json::to_string_pretty(output)
        .map_err(|error| AppError::Internal(format!("failed to render search output: {error}")))
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();
}
