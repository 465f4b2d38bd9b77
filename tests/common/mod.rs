//! 集成测试共用的应用上下文
#![allow(dead_code)]

use std::sync::Arc;

use actix_web::{body::MessageBody, dev::ServiceResponse, test};
use serde_json::Value;

use kuetx_backend::cache::ObjectCache;
use kuetx_backend::cache::object_cache::moka::MokaCacheWrapper;
use kuetx_backend::mail::MemoryMailer;
use kuetx_backend::models::users::entities::{User, UserRole, UserStatus};
use kuetx_backend::models::users::requests::CreateUserRequest;
use kuetx_backend::storage::{SeaOrmStorage, Storage};
use kuetx_backend::utils::jwt::JwtUtils;
use kuetx_backend::utils::password::hash_password;

pub const PASSWORD: &str = "Lantern-Harbor-42";

pub struct TestContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
    pub mailer: Arc<MemoryMailer>,
}

impl TestContext {
    pub async fn new() -> Self {
        let storage = SeaOrmStorage::in_memory()
            .await
            .expect("in-memory storage");
        Self {
            storage: Arc::new(storage),
            cache: Arc::new(MokaCacheWrapper::with_capacity(1_000, 60)),
            mailer: Arc::new(MemoryMailer::default()),
        }
    }

    /// 直接写库创建已激活账号
    pub async fn create_user(&self, username: &str, role: UserRole) -> User {
        self.storage
            .create_user(CreateUserRequest {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                password: hash_password(PASSWORD).expect("hash"),
                role,
                status: UserStatus::Active,
                profile_name: None,
                avatar_url: None,
            })
            .await
            .expect("create user")
    }
}

/// 构建完整应用，`$ctx` 为 `TestContext`
macro_rules! init_app {
    ($ctx:expr) => {{
        let ctx = &$ctx;
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(
                    actix_web::web::JsonConfig::default()
                        .error_handler(kuetx_backend::utils::json_error_handler),
                )
                .app_data(
                    actix_web::web::QueryConfig::default()
                        .error_handler(kuetx_backend::utils::query_error_handler),
                )
                .app_data(
                    actix_web::web::PathConfig::default()
                        .error_handler(kuetx_backend::utils::path_error_handler),
                )
                .app_data(actix_web::web::Data::new(ctx.storage.clone()))
                .app_data(actix_web::web::Data::new(ctx.cache.clone()))
                .app_data(actix_web::web::Data::new(
                    ctx.mailer.clone() as std::sync::Arc<dyn kuetx_backend::mail::Mailer>
                ))
                .configure(kuetx_backend::routes::configure_routes)
                .default_service(actix_web::web::to(kuetx_backend::routes::not_found)),
        )
        .await
    }};
}

pub async fn json_body<B: MessageBody>(resp: ServiceResponse<B>) -> Value {
    let body = test::read_body(resp).await;
    serde_json::from_slice(&body).expect("json body")
}

/// 从邮件正文中取出以 `marker` 开头的路径
pub fn link_path(body: &str, marker: &str) -> String {
    let start = body.find(marker).expect("link in email");
    body[start..]
        .split_whitespace()
        .next()
        .expect("link")
        .to_string()
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {token}"))
}

/// 直接签发 access token
pub fn access_token(user: &User) -> String {
    JwtUtils::generate_access_token(user).expect("access token")
}
