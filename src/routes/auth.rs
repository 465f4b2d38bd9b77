use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RateLimit, RequireJWT};
use crate::models::auth::requests::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RefreshTokenRequest,
    RegisterRequest, TokenObtainRequest,
};
use crate::services::AuthService;

// 懒加载的全局 AuthService 实例
static AUTH_SERVICE: Lazy<AuthService> = Lazy::new(AuthService::new_lazy);

pub async fn register(
    req: HttpRequest,
    user_data: web::Json<RegisterRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.register(user_data.into_inner(), &req).await
}

pub async fn login(
    req: HttpRequest,
    user_data: web::Json<LoginRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.login(user_data.into_inner(), &req).await
}

// 请求体可省略，此时从 cookie 读取 refresh token
pub async fn logout(
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    AUTH_SERVICE.logout(body, &req).await
}

pub async fn verify_email(
    req: HttpRequest,
    path: web::Path<(String, String)>,
) -> ActixResult<HttpResponse> {
    let (uidb64, token) = path.into_inner();
    AUTH_SERVICE.verify_email(&uidb64, &token, &req).await
}

pub async fn request_password_reset(
    req: HttpRequest,
    reset_data: web::Json<PasswordResetRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE
        .request_password_reset(reset_data.into_inner(), &req)
        .await
}

pub async fn reset_password_confirm(
    req: HttpRequest,
    path: web::Path<(String, String)>,
    confirm_data: web::Json<PasswordResetConfirmRequest>,
) -> ActixResult<HttpResponse> {
    let (uidb64, token) = path.into_inner();
    AUTH_SERVICE
        .reset_password_confirm(&uidb64, &token, confirm_data.into_inner(), &req)
        .await
}

pub async fn obtain_token(
    req: HttpRequest,
    credentials: web::Json<TokenObtainRequest>,
) -> ActixResult<HttpResponse> {
    AUTH_SERVICE.obtain_token(credentials.into_inner(), &req).await
}

pub async fn refresh_token(
    req: HttpRequest,
    body: Option<web::Json<RefreshTokenRequest>>,
) -> ActixResult<HttpResponse> {
    let body = body.map(web::Json::into_inner).unwrap_or_default();
    AUTH_SERVICE.refresh_token(body, &req).await
}

// 配置路由
pub fn configure_auth_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/register/")
            .wrap(RateLimit::register())
            .route(web::post().to(register)),
    )
    .service(
        web::resource("/login/")
            .wrap(RateLimit::login())
            .route(web::post().to(login)),
    )
    .service(
        web::resource("/logout/")
            .wrap(RequireJWT::default())
            .route(web::post().to(logout)),
    )
    .route("/verify-email/{uidb64}/{token}/", web::get().to(verify_email))
    .service(
        web::resource("/request-reset-password/")
            .wrap(RateLimit::password_reset())
            .route(web::post().to(request_password_reset)),
    )
    .service(
        web::resource("/reset-password/{uidb64}/{token}/")
            .wrap(RateLimit::new(10, 300).with_prefix("password_reset_confirm"))
            .route(web::post().to(reset_password_confirm)),
    )
    // JWT 令牌
    .service(
        web::resource("/token/")
            .wrap(RateLimit::token())
            .route(web::post().to(obtain_token)),
    )
    .service(
        web::resource("/token/refresh/")
            .wrap(RateLimit::token())
            .route(web::post().to(refresh_token)),
    );
}
