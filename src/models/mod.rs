pub mod auth;
pub mod common;
pub mod courses;
pub mod devlog;
pub mod forum;
pub mod quiz;
pub mod stats;
pub mod users;

pub use common::{ApiResponse, ErrorCode, PaginatedResponse, PaginationInfo, PaginationQuery};

/// 进程启动时间
#[derive(Debug, Clone)]
pub struct AppStartTime {
    pub start_datetime: chrono::DateTime<chrono::Utc>,
}
