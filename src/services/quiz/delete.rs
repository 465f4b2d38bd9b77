use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::QuizService;
use crate::models::quiz::requests::DeleteCategoriesRequest;
use crate::models::quiz::responses::DeleteCategoriesResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn delete_categories(
    service: &QuizService,
    request: &HttpRequest,
    delete_data: DeleteCategoriesRequest,
) -> ActixResult<HttpResponse> {
    let mut ids = delete_data.category_ids;
    ids.sort_unstable();
    ids.dedup();

    if ids.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "category_ids must not be empty",
        )));
    }

    match service.get_storage(request).delete_quiz_categories(&ids).await {
        Ok(0) => Ok(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::QuizCategoryNotFound,
            "No matching quiz categories found",
        ))),
        Ok(deleted) => {
            tracing::info!("Deleted {} quiz categories", deleted);
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                DeleteCategoriesResponse { deleted },
                "Quiz categories deleted successfully",
            )))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Quiz category deletion failed: {e}"),
            )),
        ),
    }
}
