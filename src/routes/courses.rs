use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::courses::requests::{
    CourseQueryParams, CreateContentRequest, CreateCourseRequest, UpdateContentRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::CourseService;
use crate::utils::{SafeContentIdI64, SafeIDI64};

// 懒加载的全局 CourseService 实例
static COURSE_SERVICE: Lazy<CourseService> = Lazy::new(CourseService::new_lazy);

pub async fn list_courses(
    req: HttpRequest,
    query: web::Query<CourseQueryParams>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.list_courses(&req, query.into_inner()).await
}

pub async fn create_course(
    req: HttpRequest,
    course_data: web::Json<CreateCourseRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_course(&req, course_data.into_inner())
        .await
}

pub async fn get_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.get_course(&req, course_id.0).await
}

pub async fn delete_course(req: HttpRequest, course_id: SafeIDI64) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_course(&req, course_id.0).await
}

pub async fn create_content(
    req: HttpRequest,
    course_id: SafeIDI64,
    content_data: web::Json<CreateContentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .create_content(&req, course_id.0, content_data.into_inner())
        .await
}

pub async fn update_content(
    req: HttpRequest,
    content_id: SafeContentIdI64,
    update_data: web::Json<UpdateContentRequest>,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE
        .update_content(&req, content_id.0, update_data.into_inner())
        .await
}

pub async fn delete_content(
    req: HttpRequest,
    content_id: SafeContentIdI64,
) -> ActixResult<HttpResponse> {
    COURSE_SERVICE.delete_content(&req, content_id.0).await
}

// 配置路由
pub fn configure_course_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/courses")
            .wrap(RequireJWT::write_only())
            .service(
                web::resource("/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()).write_only())
                    .route(web::get().to(list_courses))
                    .route(web::post().to(create_course)),
            )
            .service(
                web::resource("/contents/{content_id}/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::put().to(update_content))
                    .route(web::delete().to(delete_content)),
            )
            .service(
                web::resource("/{id}/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()).write_only())
                    .route(web::get().to(get_course))
                    .route(web::delete().to(delete_course)),
            )
            .service(
                web::resource("/{id}/contents/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::post().to(create_content)),
            ),
    );
}
