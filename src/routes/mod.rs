//! HTTP 路由
//!
//! `urls` 保存命名路由表，其余子模块把路径绑定到服务层处理函数。

pub mod auth;

pub mod courses;

pub mod devlog;

pub mod forum;

pub mod quiz;

pub mod schema;

pub mod stats;

pub mod urls;

pub mod users;

use actix_web::{HttpRequest, HttpResponse, web};

use crate::models::{ApiResponse, ErrorCode};

pub use auth::configure_auth_routes;
pub use courses::configure_course_routes;
pub use devlog::configure_devlog_routes;
pub use forum::configure_forum_routes;
pub use quiz::configure_quiz_routes;
pub use schema::configure_schema_routes;
pub use stats::configure_stats_routes;
pub use users::configure_user_routes;

/// 注册全部路由
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(configure_auth_routes)
        .configure(configure_stats_routes)
        .configure(configure_schema_routes)
        .configure(configure_devlog_routes)
        .configure(configure_course_routes)
        .configure(configure_user_routes)
        .configure(configure_forum_routes)
        .configure(configure_quiz_routes);
}

/// 未匹配的路径
pub async fn not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::NotFound,
        format!("No route matches {} {}", req.method(), req.path()),
    ))
}
