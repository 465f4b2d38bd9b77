use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::models::{
    ApiResponse, ErrorCode,
    auth::{LoginRequest, LoginResponse},
    users::entities::{User, UserStatus},
};
use crate::storage::Storage;
use crate::utils::jwt::JwtUtils;
use crate::utils::password::verify_password;
use crate::utils::validate::normalize_email;

use super::AuthService;

/// 校验用户名（或邮箱）与密码，并检查账户状态
///
/// 失败时直接返回对应的 HTTP 响应：凭据错误 401，未激活或已停用 403。
pub(crate) async fn authenticate_credentials(
    storage: &Arc<dyn Storage>,
    identifier: &str,
    password: &str,
) -> Result<User, HttpResponse> {
    // 邮箱与注册时一样规范化
    let identifier = if identifier.contains('@') {
        normalize_email(identifier)
    } else {
        identifier.trim().to_string()
    };

    let user = match storage.get_user_by_username_or_email(&identifier).await {
        Ok(Some(user)) if verify_password(password, &user.password_hash) => user,
        Ok(_) => {
            return Err(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
                ErrorCode::AuthFailed,
                "Username or password is incorrect",
            )));
        }
        Err(e) => {
            return Err(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Login failed: {e}"),
                )),
            );
        }
    };

    match user.status {
        UserStatus::Active => Ok(user),
        UserStatus::Inactive => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountInactive,
            "Account is not activated, please verify your email first",
        ))),
        UserStatus::Suspended => Err(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::AccountSuspended,
            "Account has been suspended",
        ))),
    }
}

pub async fn handle_login(
    service: &AuthService,
    login_request: LoginRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 校验凭据
    let user = match authenticate_credentials(
        &storage,
        &login_request.username,
        &login_request.password,
    )
    .await
    {
        Ok(user) => user,
        Err(response) => return Ok(response),
    };

    // 2. 更新最后登录时间
    if let Err(e) = storage.update_last_login(user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    // 3. 生成令牌对
    let refresh_lifetime = JwtUtils::refresh_token_lifetime(login_request.remember_me);
    match JwtUtils::generate_token_pair(&user, Some(refresh_lifetime)) {
        Ok(token_pair) => {
            tracing::info!("User {} logged in successfully", user.username);

            let refresh_cookie = JwtUtils::create_refresh_token_cookie(
                &token_pair.refresh,
                token_pair.refresh_expires_in,
            );

            let response = LoginResponse {
                access: token_pair.access,
                refresh: token_pair.refresh,
                expires_in: token_pair.expires_in,
                user,
            };

            Ok(HttpResponse::Ok()
                .cookie(refresh_cookie)
                .json(ApiResponse::success(response, "Login successful")))
        }
        Err(e) => {
            tracing::error!("Failed to generate JWT token: {}", e);
            Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    "Login failed, unable to generate token",
                )),
            )
        }
    }
}
