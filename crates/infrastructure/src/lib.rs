//! Task store adapters for the task search ports.

#![forbid(unsafe_code)]

mod in_memory_task_repository;
mod postgres_task_repository;

pub use in_memory_task_repository::InMemoryTaskRepository;
pub use postgres_task_repository::PostgresTaskRepository;
