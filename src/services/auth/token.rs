//! 令牌获取与轮换
//!
//! refresh token 使用一次即失效：轮换时旧令牌的 `jti` 写入黑名单，
//! 黑名单条目在令牌自然过期时一并过期。

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::cache::{ObjectCache, ObjectCacheExt};
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{RefreshTokenRequest, TokenObtainRequest, TokenPairResponse},
};
use crate::utils::jwt::{Claims, JwtUtils};

use super::AuthService;
use super::login::authenticate_credentials;

/// 黑名单缓存键
pub fn blacklist_key(jti: &str) -> String {
    format!("token_blacklist:{jti}")
}

pub async fn is_blacklisted(cache: &dyn ObjectCache, jti: &str) -> bool {
    cache.contains(&blacklist_key(jti)).await
}

/// 将 refresh token 加入黑名单直到其过期
pub async fn blacklist(cache: &dyn ObjectCache, claims: &Claims) {
    let ttl = claims.remaining_seconds();
    if ttl == 0 {
        return;
    }
    cache
        .insert_raw(blacklist_key(&claims.jti), claims.sub.clone(), ttl)
        .await;
}

/// 请求体优先，其次 cookie
pub(crate) fn refresh_token_from(
    body: RefreshTokenRequest,
    request: &HttpRequest,
) -> Option<String> {
    body.refresh
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .or_else(|| JwtUtils::extract_refresh_token_from_cookie(request))
}

fn rejected(message: &str) -> HttpResponse {
    HttpResponse::Unauthorized()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::error_empty(ErrorCode::TokenInvalid, message))
}

pub async fn handle_obtain_token(
    service: &AuthService,
    obtain_request: TokenObtainRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let user = match authenticate_credentials(
        &storage,
        &obtain_request.username,
        &obtain_request.password,
    )
    .await
    {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    match JwtUtils::generate_token_pair(&user, None) {
        Ok(pair) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            TokenPairResponse {
                access: pair.access,
                refresh: pair.refresh,
            },
            "Token issued successfully",
        ))),
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

pub async fn handle_refresh_token(
    service: &AuthService,
    refresh_request: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(refresh_token) = refresh_token_from(refresh_request, request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Refresh token is required",
        )));
    };

    // 1. 校验签名、过期时间与类型
    let claims = match JwtUtils::verify_refresh_token(&refresh_token) {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!("Refresh token rejected: {}", e);
            return Ok(rejected("Token is invalid or expired"));
        }
    };

    // 2. 黑名单
    let cache = service.get_cache(request);
    if is_blacklisted(cache.as_ref(), &claims.jti).await {
        return Ok(rejected("Token has been revoked"));
    }

    // 3. 用户必须仍然存在且处于激活状态
    let storage = service.get_storage(request);
    let user = match claims.user_id() {
        Some(id) => match storage.get_user_by_id(id).await {
            Ok(user) => user,
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::InternalServerError,
                        format!("Token refresh failed: {e}"),
                    )),
                );
            }
        },
        None => None,
    };
    let Some(user) = user.filter(|u| u.is_active()) else {
        return Ok(rejected("User not found or inactive"));
    };

    // 4. 轮换：旧令牌作废，新令牌沿用原有效期
    blacklist(cache.as_ref(), &claims).await;
    let lifetime = chrono::Duration::seconds(claims.exp.saturating_sub(claims.iat) as i64);

    match JwtUtils::generate_token_pair(&user, Some(lifetime)) {
        Ok(pair) => {
            let cookie =
                JwtUtils::create_refresh_token_cookie(&pair.refresh, pair.refresh_expires_in);
            Ok(HttpResponse::Ok().cookie(cookie).json(ApiResponse::success(
                TokenPairResponse {
                    access: pair.access,
                    refresh: pair.refresh,
                },
                "Token refreshed successfully",
            )))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Unable to generate token",
                )),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheResult;
    use crate::cache::object_cache::moka::MokaCacheWrapper;
    use crate::utils::jwt::TokenType;

    fn claims(exp_in: i64) -> Claims {
        let now = chrono::Utc::now().timestamp();
        Claims {
            sub: "3".into(),
            username: "student1".into(),
            role: "student".into(),
            token_type: TokenType::Refresh,
            jti: "abc123".into(),
            iat: now as usize,
            exp: (now + exp_in) as usize,
        }
    }

    #[actix_web::test]
    async fn test_blacklist() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        assert!(!is_blacklisted(&cache, "abc123").await);

        blacklist(&cache, &claims(600)).await;
        assert!(is_blacklisted(&cache, "abc123").await);
        assert_eq!(
            cache.get_raw(&blacklist_key("abc123")).await,
            CacheResult::Found("3".to_string())
        );
    }

    #[actix_web::test]
    async fn test_expired_token_not_stored() {
        let cache = MokaCacheWrapper::with_capacity(100, 60);
        blacklist(&cache, &claims(-10)).await;
        assert!(!is_blacklisted(&cache, "abc123").await);
    }

    #[test]
    fn test_refresh_token_prefers_body() {
        let req = actix_web::test::TestRequest::default()
            .cookie(actix_web::cookie::Cookie::new("refresh_token", "from-cookie"))
            .to_http_request();

        let body = RefreshTokenRequest {
            refresh: Some("from-body".into()),
        };
        assert_eq!(refresh_token_from(body, &req).as_deref(), Some("from-body"));

        let empty = RefreshTokenRequest {
            refresh: Some("  ".into()),
        };
        assert_eq!(refresh_token_from(empty, &req).as_deref(), Some("from-cookie"));
    }
}
