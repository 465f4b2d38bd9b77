use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::RequireJWT;
use crate::models::forum::requests::{CreateCommentRequest, CreatePostRequest, PostQueryParams};
use crate::services::ForumService;
use crate::utils::SafeIDI64;

static FORUM_SERVICE: Lazy<ForumService> = Lazy::new(ForumService::new_lazy);

pub async fn list_posts(
    req: HttpRequest,
    query: web::Query<PostQueryParams>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.list_posts(&req, query.into_inner()).await
}

pub async fn create_post(
    req: HttpRequest,
    post_data: web::Json<CreatePostRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.create_post(&req, post_data.into_inner()).await
}

pub async fn get_post(req: HttpRequest, post_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.get_post(&req, post_id.0).await
}

pub async fn delete_post(req: HttpRequest, post_id: SafeIDI64) -> ActixResult<HttpResponse> {
    FORUM_SERVICE.delete_post(&req, post_id.0).await
}

pub async fn create_comment(
    req: HttpRequest,
    post_id: SafeIDI64,
    comment_data: web::Json<CreateCommentRequest>,
) -> ActixResult<HttpResponse> {
    FORUM_SERVICE
        .create_comment(&req, post_id.0, comment_data.into_inner())
        .await
}

// 读公开，写需要登录
pub fn configure_forum_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/forum")
            .wrap(RequireJWT::write_only())
            .service(
                web::resource("/posts/")
                    .route(web::get().to(list_posts))
                    .route(web::post().to(create_post)),
            )
            .service(
                web::resource("/posts/{id}/")
                    .route(web::get().to(get_post))
                    .route(web::delete().to(delete_post)),
            )
            .route("/posts/{id}/comments/", web::post().to(create_comment)),
    );
}
