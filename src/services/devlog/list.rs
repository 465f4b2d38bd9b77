use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::DevlogService;
use crate::models::devlog::requests::DevlogQueryParams;
use crate::models::{ApiResponse, ErrorCode};

pub async fn list_devlogs(
    service: &DevlogService,
    request: &HttpRequest,
    query: DevlogQueryParams,
) -> ActixResult<HttpResponse> {
    match service
        .get_storage(request)
        .list_devlogs_with_pagination(query.pagination)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Devlogs retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve devlogs: {e}"),
            )),
        ),
    }
}
