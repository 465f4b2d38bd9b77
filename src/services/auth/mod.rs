pub mod login;
pub mod logout;
pub mod password_reset;
pub mod register;
pub mod token;
pub mod verify_email;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;

use crate::cache::ObjectCache;
use crate::config::AppConfig;
use crate::mail::Mailer;
use crate::models::auth::{
    LoginRequest, PasswordResetConfirmRequest, PasswordResetRequest, RefreshTokenRequest,
    RegisterRequest, TokenObtainRequest,
};
use crate::storage::Storage;
use crate::utils::AccountTokenGenerator;

pub struct AuthService {
    storage: Option<Arc<dyn Storage>>,
}

impl AuthService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    pub(crate) fn get_cache(&self, request: &HttpRequest) -> Arc<dyn ObjectCache> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn ObjectCache>>>()
            .expect("Cache not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_mailer(&self, request: &HttpRequest) -> Arc<dyn Mailer> {
        request
            .app_data::<actix_web::web::Data<Arc<dyn Mailer>>>()
            .expect("Mailer not found in app data")
            .get_ref()
            .clone()
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    pub(crate) fn account_tokens(&self) -> AccountTokenGenerator {
        AccountTokenGenerator::from_config()
    }

    // 用户注册
    pub async fn register(
        &self,
        register_request: RegisterRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        register::handle_register(self, register_request, request).await
    }

    // 邮箱验证
    pub async fn verify_email(
        &self,
        uidb64: &str,
        token: &str,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        verify_email::handle_verify_email(self, uidb64, token, request).await
    }

    // 登录验证
    pub async fn login(
        &self,
        login_request: LoginRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        login::handle_login(self, login_request, request).await
    }

    // 登出
    pub async fn logout(
        &self,
        logout_request: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        logout::handle_logout(self, logout_request, request).await
    }

    // 获取令牌对
    pub async fn obtain_token(
        &self,
        obtain_request: TokenObtainRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_obtain_token(self, obtain_request, request).await
    }

    // 刷新令牌
    pub async fn refresh_token(
        &self,
        refresh_request: RefreshTokenRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        token::handle_refresh_token(self, refresh_request, request).await
    }

    // 申请重置密码
    pub async fn request_password_reset(
        &self,
        reset_request: PasswordResetRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_request_reset(self, reset_request, request).await
    }

    // 确认重置密码
    pub async fn reset_password_confirm(
        &self,
        uidb64: &str,
        token: &str,
        confirm_request: PasswordResetConfirmRequest,
        request: &HttpRequest,
    ) -> ActixResult<HttpResponse> {
        password_reset::handle_reset_confirm(self, uidb64, token, confirm_request, request).await
    }
}

/// 拼接站点地址与路径
pub(crate) fn absolute_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
