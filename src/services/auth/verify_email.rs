use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::require_jwt::invalidate_user_cache;
use crate::models::{
    ApiResponse, ErrorCode,
    users::{entities::UserStatus, requests::UpdateUserRequest},
};
use crate::utils::{TokenPurpose, decode_uid};

use super::AuthService;

fn invalid_link() -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::error_empty(
        ErrorCode::VerificationLinkInvalid,
        "Verification link is invalid or has expired",
    ))
}

pub async fn handle_verify_email(
    service: &AuthService,
    uidb64: &str,
    token: &str,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

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
                    format!("Email verification failed: {e}"),
                )),
            );
        }
    };

    if user.is_active() {
        return Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Email already verified")));
    }

    if !service
        .account_tokens()
        .check_token(TokenPurpose::EmailVerification, &user, token)
    {
        return Ok(invalid_link());
    }

    let update = UpdateUserRequest {
        status: Some(UserStatus::Active),
        ..Default::default()
    };

    match storage.update_user(user.id, update).await {
        Ok(Some(user)) => {
            invalidate_user_cache(service.get_cache(request).as_ref(), user.id).await;
            tracing::info!("User {} verified email {}", user.username, user.email);
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Email verified successfully")))
        }
        Ok(None) => Ok(invalid_link()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("Email verification failed: {e}"),
            )),
        ),
    }
}
