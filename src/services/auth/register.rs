use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::mail::EmailMessage;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::RegisterRequest,
    users::{
        entities::{User, UserRole, UserStatus},
        requests::CreateUserRequest,
    },
};
use crate::routes::urls::reverse;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::validate::{normalize_email, validate_email, validate_password, validate_username};
use crate::utils::{TokenPurpose, encode_uid};

use super::{AuthService, absolute_url};

pub async fn handle_register(
    service: &AuthService,
    register_request: RegisterRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let username = register_request.username.trim().to_string();
    let email = normalize_email(&register_request.email);

    // 1. 格式校验
    if let Err(msg) = validate_username(&username) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserNameInvalid, msg)));
    }

    if let Err(msg) = validate_email(&email) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserEmailInvalid, msg)));
    }

    let profile_name = register_request.profile_name.unwrap_or_default();
    let personal = [username.as_str(), email.as_str(), profile_name.as_str()];
    if let Err(msg) = validate_password(&register_request.password, &personal) {
        return Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::UserPasswordInvalid, msg)));
    }

    // 2. 唯一性检查
    if let Err(response) = check_username_exists(&storage, &username).await {
        return Ok(response);
    }

    if let Err(response) = check_email_exists(&storage, &email).await {
        return Ok(response);
    }

    // 3. 哈希密码并创建未激活用户
    let password_hash = match hash_password(&register_request.password) {
        Ok(hash) => hash,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Password hashing failed: {e}"),
                )),
            );
        }
    };

    let create_request = CreateUserRequest {
        username,
        email,
        password: password_hash,
        role: UserRole::Student,
        status: UserStatus::Inactive,
        profile_name: (!profile_name.trim().is_empty()).then(|| profile_name.trim().to_string()),
        avatar_url: None,
    };

    let user = match storage.create_user(create_request).await {
        Ok(user) => user,
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::RegisterFailed,
                    format!("Register failed: {e}"),
                )),
            );
        }
    };

    // 4. 发送验证邮件
    let message = match send_verification_email(service, &user, request).await {
        Ok(()) => "Registration successful, please check your email to verify your account",
        Err(e) => {
            tracing::error!("Failed to send verification email to {}: {}", user.email, e);
            "Registration successful, but the verification email could not be sent"
        }
    };

    tracing::info!("User {} registered", user.username);
    Ok(HttpResponse::Created().json(ApiResponse::success(user, message)))
}

async fn send_verification_email(
    service: &AuthService,
    user: &User,
    request: &HttpRequest,
) -> crate::errors::Result<()> {
    let config = service.get_config();
    let token = service
        .account_tokens()
        .make_token(TokenPurpose::EmailVerification, user);
    let uid = encode_uid(user.id);
    let path = reverse("verify-email", &[&uid, &token]).ok_or_else(|| {
        crate::errors::KuetxError::not_found("Route 'verify-email' is not registered")
    })?;
    let link = absolute_url(&config.email.site_url, &path);

    service
        .get_mailer(request)
        .send(EmailMessage {
            to: user.email.clone(),
            subject: format!("Verify your {} account", config.app.system_name),
            body: format!(
                "Hi {},\n\nPlease confirm your email address by opening the link below:\n\n{}\n\nThe link expires in {} hours.",
                user.username,
                link,
                config.tokens.account_token_ttl / 3600
            ),
        })
        .await
}

async fn check_username_exists(
    storage: &Arc<dyn Storage>,
    username: &str,
) -> Result<(), HttpResponse> {
    match storage.get_user_by_username(username).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserNameAlreadyExists,
            "Username already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}

async fn check_email_exists(storage: &Arc<dyn Storage>, email: &str) -> Result<(), HttpResponse> {
    match storage.get_user_by_email(email).await {
        Ok(Some(_)) => Err(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::UserEmailAlreadyExists,
            "Email already exists",
        ))),
        Ok(None) => Ok(()),
        Err(e) => Err(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::RegisterFailed,
                format!("Register failed: {e}"),
            )),
        ),
    }
}
