//! Domain entities and invariants for role-scoped task search.

#![forbid(unsafe_code)]

mod permission;
mod role_assignment;
mod search;
mod sort;
mod task;

pub use permission::PermissionType;
pub use role_assignment::{
    Classification, GrantType, GrantTypeFamily, RoleAssignment, RoleAttributeKey, RoleType,
};
pub use search::{
    SearchOperator, SearchParameter, SearchParameterKey, SearchRequest, SearchTaskRequest,
};
pub use sort::{SortDirection, SortField, SortingParameter};
pub use task::{TaskRecord, TaskRolePermissions, TaskSortValue, TaskState, TaskSummary};
