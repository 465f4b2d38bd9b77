use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ForumService;
use crate::middlewares::RequireJWT;
use crate::models::forum::requests::CreateCommentRequest;
use crate::models::{ApiResponse, ErrorCode};

pub async fn create_comment(
    service: &ForumService,
    request: &HttpRequest,
    post_id: i64,
    comment_data: CreateCommentRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    let body = comment_data.body.trim().to_string();
    if body.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Comment body is required",
        )));
    }

    let storage = service.get_storage(request);
    match storage.get_post_by_id(post_id).await {
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound()
                .json(ApiResponse::error_empty(ErrorCode::PostNotFound, "Post not found")));
        }
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get post: {e}"),
                )),
            );
        }
    }

    match storage.create_comment(post_id, uid, body).await {
        Ok(comment) => Ok(HttpResponse::Created()
            .json(ApiResponse::success(comment, "Comment created successfully"))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Comment creation failed: {e}"),
            )),
        ),
    }
}
