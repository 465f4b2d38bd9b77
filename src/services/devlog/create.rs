use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DevlogService;
use crate::middlewares::RequireJWT;
use crate::models::devlog::requests::CreateDevlogRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_devlog(
    service: &DevlogService,
    request: &HttpRequest,
    mut devlog_data: CreateDevlogRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    devlog_data.title = devlog_data.title.trim().to_string();
    if devlog_data.title.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Devlog title is required",
        )));
    }

    match service.get_storage(request).create_devlog(uid, devlog_data).await {
        Ok(devlog) => Ok(HttpResponse::Created().json(ApiResponse::success(
            devlog,
            "Devlog published successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Devlog creation failed: {e}"),
            )),
        ),
    }
}
