/*!
 * 速率限制中间件
 *
 * 固定窗口计数，键为 `前缀:user:{id}` 或 `前缀:ip:{addr}`。超过限制返回 429，
 * 并在 `Retry-After` 中给出窗口剩余秒数。放行的响应带 `X-RateLimit-Limit`
 * 与 `X-RateLimit-Remaining`。
 *
 * ```rust,ignore
 * web::resource("/login/")
 *     .wrap(RateLimit::login())
 *     .route(web::post().to(login))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    http::header::{CONTENT_TYPE, HeaderName, HeaderValue},
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use moka::future::Cache;
use once_cell::sync::Lazy;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::warn;

use crate::models::{ApiResponse, ErrorCode};

// 窗口内计数与窗口起点
#[derive(Clone, Copy)]
struct Window {
    count: u32,
    started: Instant,
}

static RATE_LIMIT_CACHE: Lazy<Cache<String, Window>> = Lazy::new(|| {
    Cache::builder()
        .time_to_idle(Duration::from_secs(3600))
        .max_capacity(100_000)
        .build()
});

#[derive(Clone)]
pub struct RateLimit {
    max_requests: u32,
    window_secs: u64,
    key_prefix: String,
}

impl RateLimit {
    pub fn new(max_requests: u32, window_secs: u64) -> Self {
        Self {
            max_requests,
            window_secs,
            key_prefix: String::new(),
        }
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.key_prefix = prefix.to_string();
        self
    }

    /// 登录：5次/分钟
    pub fn login() -> Self {
        Self::new(5, 60).with_prefix("login")
    }

    /// 注册：3次/分钟
    pub fn register() -> Self {
        Self::new(3, 60).with_prefix("register")
    }

    /// 获取与刷新令牌：10次/分钟
    pub fn token() -> Self {
        Self::new(10, 60).with_prefix("token")
    }

    /// 申请重置密码：3次/5分钟
    pub fn password_reset() -> Self {
        Self::new(3, 300).with_prefix("password_reset")
    }
}

/// 客户端地址，优先使用 Forwarded / X-Forwarded-For
fn extract_client_ip(req: &ServiceRequest) -> String {
    let info = req.connection_info();
    match info.realip_remote_addr() {
        Some(addr) if addr.parse::<std::net::IpAddr>().is_ok() => addr.to_string(),
        // 可能带端口
        Some(addr) => addr
            .parse::<std::net::SocketAddr>()
            .map(|s| s.ip().to_string())
            .unwrap_or_else(|_| addr.to_string()),
        None => "unknown".to_string(),
    }
}

fn extract_user_id(req: &ServiceRequest) -> Option<i64> {
    use crate::models::users::entities::User;
    req.extensions().get::<User>().map(|user| user.id)
}

fn create_rate_limit_response(retry_after: u64) -> HttpResponse {
    HttpResponse::build(StatusCode::TOO_MANY_REQUESTS)
        .insert_header((CONTENT_TYPE, "application/json; charset=utf-8"))
        .insert_header(("Retry-After", retry_after.to_string()))
        .insert_header(("X-RateLimit-Remaining", "0"))
        .json(ApiResponse::<()>::error_empty(
            ErrorCode::RateLimitExceeded,
            "Request was throttled, please try again later",
        ))
}

/// 计数一次，超限时返回需等待的秒数
async fn hit(key: String, max_requests: u32, window: Duration) -> Result<u32, u64> {
    let now = Instant::now();
    let current = match RATE_LIMIT_CACHE.get(&key).await {
        Some(w) if now.duration_since(w.started) < window => w,
        _ => Window {
            count: 0,
            started: now,
        },
    };

    if current.count >= max_requests {
        let elapsed = now.duration_since(current.started);
        return Err(window.saturating_sub(elapsed).as_secs().max(1));
    }

    RATE_LIMIT_CACHE
        .insert(
            key,
            Window {
                count: current.count + 1,
                started: current.started,
            },
        )
        .await;
    Ok(max_requests - current.count - 1)
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            config: self.clone(),
        }))
    }
}

pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    config: RateLimit,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
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
        let config = self.config.clone();

        Box::pin(async move {
            let identifier = extract_user_id(&req)
                .map(|id| format!("user:{id}"))
                .unwrap_or_else(|| format!("ip:{}", extract_client_ip(&req)));
            let cache_key = if config.key_prefix.is_empty() {
                identifier
            } else {
                format!("{}:{}", config.key_prefix, identifier)
            };

            let window = Duration::from_secs(config.window_secs);
            match hit(cache_key.clone(), config.max_requests, window).await {
                Ok(remaining) => {
                    let mut res = srv.call(req).await?;
                    let headers = res.headers_mut();
                    headers.insert(
                        HeaderName::from_static("x-ratelimit-limit"),
                        HeaderValue::from(config.max_requests),
                    );
                    headers.insert(
                        HeaderName::from_static("x-ratelimit-remaining"),
                        HeaderValue::from(remaining),
                    );
                    Ok(res.map_into_left_body())
                }
                Err(retry_after) => {
                    warn!(
                        "Rate limit exceeded for key: {} (limit {}/{}s)",
                        cache_key, config.max_requests, config.window_secs
                    );
                    Ok(req.into_response(
                        create_rate_limit_response(retry_after).map_into_right_body(),
                    ))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{App, test, web};

    #[::core::prelude::v1::test]
    fn test_rate_limit_presets() {
        let login = RateLimit::login();
        assert_eq!((login.max_requests, login.window_secs), (5, 60));
        assert_eq!(login.key_prefix, "login");

        let reset = RateLimit::password_reset();
        assert_eq!((reset.max_requests, reset.window_secs), (3, 300));
    }

    #[actix_web::test]
    async fn test_hit_counts_down_then_blocks() {
        let window = Duration::from_secs(60);
        assert_eq!(hit("unit:a".into(), 2, window).await, Ok(1));
        assert_eq!(hit("unit:a".into(), 2, window).await, Ok(0));
        assert!(hit("unit:a".into(), 2, window).await.is_err());
        assert_eq!(hit("unit:b".into(), 2, window).await, Ok(1));
    }

    #[actix_web::test]
    async fn test_middleware_returns_429() {
        let app = test::init_service(
            App::new().service(
                web::resource("/limited")
                    .wrap(RateLimit::new(1, 60).with_prefix("unit-mw"))
                    .to(|| async { HttpResponse::Ok().finish() }),
            ),
        )
        .await;

        let make = || {
            test::TestRequest::get()
                .uri("/limited")
                .insert_header(("X-Forwarded-For", "203.0.113.9"))
                .to_request()
        };
        let resp = test::call_service(&app, make()).await;
        assert!(resp.status().is_success());
        assert_eq!(resp.headers().get("X-RateLimit-Limit").unwrap(), "1");
        assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), "0");

        let resp = test::call_service(&app, make()).await;
        assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(resp.headers().contains_key("Retry-After"));
    }
}
