use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::ForumService;
use crate::middlewares::RequireJWT;
use crate::models::forum::requests::{CreatePostRequest, PostListQuery, PostQueryParams};
use crate::models::forum::responses::PostDetailResponse;
use crate::models::users::entities::UserRole;
use crate::models::{ApiResponse, ErrorCode};

fn post_not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ApiResponse::error_empty(
        ErrorCode::PostNotFound,
        "Post not found",
    ))
}

pub async fn list_posts(
    service: &ForumService,
    request: &HttpRequest,
    query: PostQueryParams,
) -> ActixResult<HttpResponse> {
    let list_query = PostListQuery {
        page: Some(query.pagination.page),
        size: Some(query.pagination.size),
        search: query.search,
    };

    match service
        .get_storage(request)
        .list_posts_with_pagination(list_query)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Post list retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to retrieve post list: {e}"),
            )),
        ),
    }
}

pub async fn create_post(
    service: &ForumService,
    request: &HttpRequest,
    mut post_data: CreatePostRequest,
) -> ActixResult<HttpResponse> {
    let Some(uid) = RequireJWT::extract_user_id(request) else {
        return Ok(HttpResponse::Unauthorized().json(ApiResponse::error_empty(
            ErrorCode::Unauthorized,
            "Unauthorized: missing user id",
        )));
    };

    post_data.title = post_data.title.trim().to_string();
    if post_data.title.is_empty() || post_data.body.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::ValidationFailed,
            "Post title and body are required",
        )));
    }

    match service.get_storage(request).create_post(uid, post_data).await {
        Ok(post) => {
            tracing::info!("Forum post {} created by {}", post.id, uid);
            Ok(HttpResponse::Created()
                .json(ApiResponse::success(post, "Post created successfully")))
        }
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Post creation failed: {e}"),
            )),
        ),
    }
}

pub async fn get_post(
    service: &ForumService,
    request: &HttpRequest,
    post_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    let post = match storage.get_post_by_id(post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(post_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get post: {e}"),
                )),
            );
        }
    };

    match storage.list_comments(post.id).await {
        Ok(comments) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            PostDetailResponse { post, comments },
            "Post retrieved successfully",
        ))),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Failed to get comments: {e}"),
            )),
        ),
    }
}

pub async fn delete_post(
    service: &ForumService,
    request: &HttpRequest,
    post_id: i64,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let uid = RequireJWT::extract_user_id(request);
    let role = RequireJWT::extract_user_role(request);

    let post = match storage.get_post_by_id(post_id).await {
        Ok(Some(post)) => post,
        Ok(None) => return Ok(post_not_found()),
        Err(e) => {
            return Ok(
                HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                    ErrorCode::InternalServerError,
                    format!("Failed to get post: {e}"),
                )),
            );
        }
    };

    // 作者或管理员
    if role != Some(UserRole::Admin) && uid != Some(post.author_id) {
        return Ok(HttpResponse::Forbidden().json(ApiResponse::error_empty(
            ErrorCode::PostPermissionDenied,
            "You do not have permission to delete this post",
        )));
    }

    match storage.delete_post(post_id).await {
        Ok(true) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty("Post deleted successfully")))
        }
        Ok(false) => Ok(post_not_found()),
        Err(e) => Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                format!("Post deletion failed: {e}"),
            )),
        ),
    }
}
