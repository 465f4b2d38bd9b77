use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireJWT;
use crate::models::{ApiResponse, auth::RefreshTokenRequest};
use crate::utils::jwt::JwtUtils;

use super::AuthService;
use super::token::{blacklist, refresh_token_from};

pub async fn handle_logout(
    service: &AuthService,
    logout_request: RefreshTokenRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    // 只作废当前用户自己的有效 refresh token，其余直接忽略
    let user_id = RequireJWT::extract_user_id(request);
    if let Some(token) = refresh_token_from(logout_request, request)
        && let Ok(claims) = JwtUtils::verify_refresh_token(&token)
    {
        if user_id.is_some() && claims.user_id() == user_id {
            blacklist(service.get_cache(request).as_ref(), &claims).await;
        } else {
            tracing::warn!("Logout ignored refresh token of another user");
        }
    }

    if let Some(user) = RequireJWT::extract_user_claims(request) {
        tracing::info!("User {} logged out", user.username);
    }

    Ok(HttpResponse::Ok()
        .cookie(JwtUtils::create_empty_refresh_token_cookie())
        .json(ApiResponse::success_empty("Logout successful")))
}
