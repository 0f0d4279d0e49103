pub mod auth;
pub mod response;

pub use auth::{require_permission, AuthUser, PermissionGuard};
pub use response::{ApiResponse, ApiResult};
