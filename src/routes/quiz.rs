use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::quiz::requests::{
    CreateCategoryRequest, DeleteCategoriesRequest, SubmitQuizRequest,
};
use crate::models::users::entities::UserRole;
use crate::services::QuizService;
use crate::utils::SafeIDI64;

static QUIZ_SERVICE: Lazy<QuizService> = Lazy::new(QuizService::new_lazy);

pub async fn list_categories(req: HttpRequest) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.list_categories(&req).await
}

pub async fn create_category(
    req: HttpRequest,
    category_data: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .create_category(&req, category_data.into_inner())
        .await
}

pub async fn update_category(
    req: HttpRequest,
    category_id: SafeIDI64,
    category_data: web::Json<CreateCategoryRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .update_category(&req, category_id.0, category_data.into_inner())
        .await
}

pub async fn get_questions(req: HttpRequest, category_id: SafeIDI64) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.get_questions(&req, category_id.0).await
}

pub async fn submit(
    req: HttpRequest,
    submission: web::Json<SubmitQuizRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE.submit(&req, submission.into_inner()).await
}

pub async fn delete_categories(
    req: HttpRequest,
    delete_data: web::Json<DeleteCategoriesRequest>,
) -> ActixResult<HttpResponse> {
    QUIZ_SERVICE
        .delete_categories(&req, delete_data.into_inner())
        .await
}

// 配置路由
pub fn configure_quiz_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quiz")
            .wrap(RequireJWT::write_only())
            .service(
                web::resource("/categories/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()).write_only())
                    .route(web::get().to(list_categories))
                    .route(web::post().to(create_category)),
            )
            .service(
                web::resource("/categories/{id}/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::put().to(update_category)),
            )
            // 答题需要登录
            .service(
                web::resource("/categories/{id}/questions/")
                    .wrap(RequireRole::new_any(UserRole::all_roles()))
                    .route(web::get().to(get_questions)),
            )
            .route("/submit/", web::post().to(submit))
            .service(
                web::resource("/delete/")
                    .wrap(RequireRole::new_any(UserRole::staff_roles()))
                    .route(web::delete().to(delete_categories)),
            ),
    );
}
