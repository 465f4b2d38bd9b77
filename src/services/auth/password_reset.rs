use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::mail::EmailMessage;
use crate::middlewares::require_jwt::invalidate_user_cache;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{PasswordResetConfirmRequest, PasswordResetRequest},
    users::{entities::User, requests::UpdateUserRequest},
};
use crate::routes::urls::reverse;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_password};
use crate::utils::{TokenPurpose, decode_uid, encode_uid};

use super::{AuthService, absolute_url};

// 不论邮箱是否存在都返回同样的提示
const RESET_REQUESTED_MESSAGE: &str =
    "If an account with that email exists, a password reset link has been sent";

fn invalid_link() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::ResetLinkInvalid,
        "Password reset link is invalid or has expired",
    ))
}

pub async fn handle_request_reset(
    service: &AuthService,
    reset_request: PasswordResetRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let email = normalize_email(&reset_request.email);

    match storage.get_user_by_email(&email).await {
        Ok(Some(user)) => {
            if let Err(e) = send_reset_email(service, &user, request).await {
                tracing::error!("Failed to send password reset email to {}: {}", user.email, e);
            }
        }
        Ok(None) => tracing::debug!("Password reset requested for unknown email"),
        Err(e) => tracing::error!("Password reset lookup failed: {}", e),
    }

    Ok(HttpResponse::Ok().json(ApiResponse::success_empty(RESET_REQUESTED_MESSAGE)))
}

async fn send_reset_email(
    service: &AuthService,
    user: &User,
    request: &HttpRequest,
) -> crate::errors::Result<()> {
    let config = service.get_config();
    let token = service
        .account_tokens()
        .make_token(TokenPurpose::PasswordReset, user);
    let uid = encode_uid(user.id);
    let path = reverse("reset-password-confirm", &[&uid, &token]).ok_or_else(|| {
        crate::errors::KuetxError::not_found("Route 'reset-password-confirm' is not registered")
    })?;
    let link = absolute_url(&config.email.frontend_url, &path);

    service
        .get_mailer(request)
        .send(EmailMessage {
            to: user.email.clone(),
            subject: format!("Reset your {} password", config.app.system_name),
            body: format!(
                "Hi {},\n\nA password reset was requested for your account. Open the link below to choose a new password:\n\n{}\n\nIf you did not request this, you can ignore this email.",
                user.username, link
            ),
        })
        .await
}

pub async fn handle_reset_confirm(
    service: &AuthService,
    uidb64: &str,
    token: &str,
    confirm_request: PasswordResetConfirmRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    // 1. 校验链接
    let Some(user_id) = decode_uid(uidb64) else {
        return Ok(invalid_link());
    };

    let user = match storage.get_user_by_id(user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return Ok(invalid_link()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Password reset failed: {e}"),
                )),
            );
        }
    };

    if !service
        .account_tokens()
        .check_token(TokenPurpose::PasswordReset, &user, token)
    {
        return Ok(invalid_link());
    }

    // 2. 校验新密码
    if confirm_request.password != confirm_request.confirm_password {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::PasswordMismatch,
            "Passwords do not match",
        )));
    }

    let profile_name = user.profile.profile_name.clone();
    if let Err(msg) = validate_password(
        &confirm_request.password,
        &[&user.username, &user.email, &profile_name],
    ) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    // 3. 更新密码，令牌随密码哈希变化而失效
    let password_hash = match hash_password(&confirm_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::UserUpdateFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let update = UpdateUserRequest {
        password: Some(password_hash),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(user)) => {
            invalidate_user_cache(service.get_cache(request).as_ref(), user.id).await;
            tracing::info!("User {} reset password", user.username);
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Password has been reset")))
        }
        Ok(None) => Ok(invalid_link()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Password reset failed: {e}"),
            )),
        ),
    }
}
