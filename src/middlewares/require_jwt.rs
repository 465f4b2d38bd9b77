/*!
 * JWT 认证中间件
 *
 * 校验 `Authorization: Bearer <access token>`，通过后把当前用户写入请求扩展。
 *
 * ```rust,ignore
 * web::scope("/users")
 *     .wrap(RequireJWT)                 // 所有请求都需要登录
 *     .route("/me/", web::get().to(me));
 *
 * web::scope("/forum")
 *     .wrap(RequireJWT::write_only())   // GET/HEAD/OPTIONS 允许匿名
 *     .route("/posts/", web::get().to(list_posts))
 *     .route("/posts/", web::post().to(create_post));
 * ```
 *
 * 处理函数中通过 `RequireJWT::extract_user_claims(&req)` 获取用户。
 * 用户信息按 ID 缓存在 ObjectCache 中（键 `user:{id}`），资料变更时需调用
 * `invalidate_user_cache`。
 */

use crate::cache::{CacheResult, ObjectCache, ObjectCacheExt};
use crate::config::AppConfig;
use crate::models::ErrorCode;
use crate::models::users::entities::{User, UserRole};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::{rc::Rc, sync::Arc};
use tracing::{debug, info};

use super::{create_error_response, is_safe_method};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Clone, Copy, Default)]
pub struct RequireJWT {
    allow_anonymous_reads: bool,
}

/// 当前用户的缓存键
pub fn user_cache_key(user_id: i64) -> String {
    format!("user:{user_id}")
}

/// 用户状态或资料变更后清除缓存
pub async fn invalidate_user_cache(cache: &dyn ObjectCache, user_id: i64) {
    cache.remove(&user_cache_key(user_id)).await;
}

fn bearer_token(req: &ServiceRequest) -> Option<&str> {
    req.headers()
        .get(actix_web::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix(BEARER_PREFIX))
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

// 提取并验证 access token，返回当前用户
async fn authenticate(req: &ServiceRequest, token: &str) -> Result<User, String> {
    let claims = JwtUtils::verify_access_token(token).map_err(|err| {
        info!("JWT token validation failed: {}", err);
        "Invalid or expired token".to_string()
    })?;
    let user_id = claims
        .user_id()
        .ok_or_else(|| "Invalid user ID in token".to_string())?;

    let cache = req
        .app_data::<web::Data<Arc<dyn ObjectCache>>>()
        .map(|data| data.get_ref().clone())
        .ok_or_else(|| "Cache not configured".to_string())?;

    let key = user_cache_key(user_id);
    let user = match cache.get_json::<User>(&key).await {
        CacheResult::Found(user) => user,
        _ => {
            let storage = req
                .app_data::<web::Data<Arc<dyn Storage>>>()
                .map(|data| data.get_ref().clone())
                .ok_or_else(|| "Storage not configured".to_string())?;

            let user = storage
                .get_user_by_id(user_id)
                .await
                .map_err(|_| "Failed to retrieve user from storage".to_string())?
                .ok_or_else(|| "User not found".to_string())?;

            cache
                .insert_json(key, &user, AppConfig::get().cache.default_ttl)
                .await;
            user
        }
    };

    if !user.is_active() {
        return Err("User is not active".to_string());
    }
    Ok(user)
}

impl RequireJWT {
    /// 只对写操作强制认证；读请求若携带令牌仍会解析用户
    pub fn write_only() -> Self {
        Self {
            allow_anonymous_reads: true,
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequireJWT
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequireJWTMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequireJWTMiddleware {
            service: Rc::new(service),
            allow_anonymous_reads: self.allow_anonymous_reads,
        }))
    }
}

pub struct RequireJWTMiddleware<S> {
    service: Rc<S>,
    allow_anonymous_reads: bool,
}

impl<S, B> Service<ServiceRequest> for RequireJWTMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let anonymous_ok = self.allow_anonymous_reads && is_safe_method(req.method());

        Box::pin(async move {
            // CORS 预检直接放行
            if req.method() == actix_web::http::Method::OPTIONS {
                return Ok(srv.call(req).await?.map_into_left_body());
            }

            let result = match bearer_token(&req) {
                Some(token) => {
                    let token = token.to_string();
                    authenticate(&req, &token).await
                }
                None => Err("Authentication credentials were not provided".to_string()),
            };

            match result {
                Ok(user) => {
                    debug!("JWT authentication successful for ID: {}", user.id);
                    req.extensions_mut().insert(user);
                    Ok(srv.call(req).await?.map_into_left_body())
                }
                Err(_) if anonymous_ok => Ok(srv.call(req).await?.map_into_left_body()),
                Err(err) => {
                    info!(
                        "JWT authentication failed for request to {}: {}",
                        req.path(),
                        err
                    );
                    let response = create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        &err,
                    );
                    Ok(req.into_response(response.map_into_right_body()))
                }
            }
        })
    }
}

impl RequireJWT {
    /// 从请求扩展中提取当前用户
    pub fn extract_user_claims(req: &actix_web::HttpRequest) -> Option<User> {
        req.extensions().get::<User>().cloned()
    }

    pub fn extract_user_id(req: &actix_web::HttpRequest) -> Option<i64> {
        req.extensions().get::<User>().map(|user| user.id)
    }

    pub fn extract_user_role(req: &actix_web::HttpRequest) -> Option<UserRole> {
        req.extensions().get::<User>().map(|user| user.role.clone())
    }
}
