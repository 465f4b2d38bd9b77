use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DevlogService;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_devlog(
    service: &DevlogService,
    request: &HttpRequest,
    devlog_id: i64,
) -> ActixResult<HttpResponse> {
    match service.get_storage(request).get_devlog_by_id(devlog_id).await {
        Ok(Some(devlog)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            devlog,
            "Devlog retrieved successfully",
        ))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::DevlogNotFound,
            "Devlog not found",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get devlog: {e}"),
            )),
        ),
    }
}
