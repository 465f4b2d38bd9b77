use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::UserService;
use crate::middlewares::{RequireJWT, require_jwt::invalidate_user_cache};
use crate::models::{
    ApiResponse, ErrorCode,
    users::requests::{UpdateProfileRequest, UpdateUserRequest},
};
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_email, validate_password};

fn unauthorized() -> HttpResponse {
    HttpResponse::Unauthorized().json(ApiResponse::error_empty(
        ErrorCode::Unauthorized,
        "Unauthorized access, please login",
    ))
}

pub async fn get_me(_service: &UserService, request: &HttpRequest) -> ActixResult<HttpResponse> {
    match RequireJWT::extract_user_claims(request) {
        Some(user) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            user,
            "User information retrieved successfully",
        ))),
        None => Ok(unauthorized()),
    }
}

pub async fn update_me(
    service: &UserService,
    update_data: UpdateProfileRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let Some(current) = RequireJWT::extract_user_claims(request) else {
        return Ok(unauthorized());
    };
    let storage = service.get_storage(request);

    let mut update = UpdateUserRequest {
        profile_name: update_data.profile_name.map(|s| s.trim().to_string()),
        avatar_url: update_data.avatar_url,
        ..Default::default()
    };

    // 邮箱：格式与唯一性
    if let Some(email) = update_data.email {
        let email = normalize_email(&email);
        if let Err(msg) = validate_email(&email) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
        }
        if email != current.email {
            match storage.get_user_by_email(&email).await {
                Ok(Some(_)) => {
                    return Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
                        ErrorCode::UserEmailAlreadyExists,
                        "Email already exists",
                    )));
                }
                Ok(None) => {}
                Err(e) => {
                    return Ok(
                        HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                            ErrorCode::UserUpdateFailed,
                            format!("User update failed: {e}"),
                        )),
                    );
                }
            }
            update.email = Some(email);
        }
    }

    // 密码：策略校验后哈希
    if let Some(password) = update_data.password {
        let email = update.email.as_deref().unwrap_or(&current.email);
        let profile_name = update
            .profile_name
            .as_deref()
            .unwrap_or(&current.profile.profile_name);
        if let Err(msg) = validate_password(&password, &[&current.username, email, profile_name]) {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
        }
        match hash_password(&password) {
            Ok(hash) => update.password = Some(hash),
            Err(e) => {
                return Ok(
                    HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                        ErrorCode::UserUpdateFailed,
                        format!("Password hashing failed: {e}"),
                    )),
                );
            }
        }
    }

    match storage.update_user(current.id, update).await {
        Ok(Some(user)) => {
            invalidate_user_cache(service.get_cache(request).as_ref(), user.id).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success(user, "Profile updated successfully")))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::UserNotFound,
            "User not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::UserUpdateFailed,
                format!("User update failed: {e}"),
            )),
        ),
    }
}
