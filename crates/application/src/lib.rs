//! Application services and ports for role-scoped task search.

#![forbid(unsafe_code)]

mod clock;
mod filter_signature;
mod pagination;
mod predicate;
pub mod query_compiler;
mod sorting;
mod task_ports;
mod task_search_service;

pub use clock::{Clock, FixedClock, SystemClock};
pub use filter_signature::build_filter_signatures;
pub use pagination::OffsetPagination;
pub use predicate::{TaskField, TaskPredicate};
pub use query_compiler::CompiledTaskQuery;
pub use sorting::{SortKey, TaskSort};
pub use task_ports::{TaskQuery, TaskRepository};
pub use task_search_service::{
    COMPLETABLE_PERMISSIONS, TaskSearchResult, TaskSearchService, TaskSummarySearchResult,
};
