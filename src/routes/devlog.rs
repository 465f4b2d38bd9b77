use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::devlog::requests::{CreateDevlogRequest, DevlogQueryParams};
use crate::models::users::entities::UserRole;
use crate::services::DevlogService;
use crate::utils::SafeIDI64;

static DEVLOG_SERVICE: Lazy<DevlogService> = Lazy::new(DevlogService::new_lazy);

pub async fn list_devlogs(
    req: HttpRequest,
    query: web::Query<DevlogQueryParams>,
) -> ActixResult<HttpResponse> {
    DEVLOG_SERVICE.list_devlogs(&req, query.into_inner()).await
}

pub async fn create_devlog(
    req: HttpRequest,
    devlog_data: web::Json<CreateDevlogRequest>,
) -> ActixResult<HttpResponse> {
    DEVLOG_SERVICE
        .create_devlog(&req, devlog_data.into_inner())
        .await
}

pub async fn get_devlog(req: HttpRequest, devlog_id: SafeIDI64) -> ActixResult<HttpResponse> {
    DEVLOG_SERVICE.get_devlog(&req, devlog_id.0).await
}

// 挂载在根路径下
pub fn configure_devlog_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/devlogs")
            .wrap(RequireJWT::write_only())
            .service(
                web::resource("/")
                    .wrap(RequireRole::new_any(UserRole::admin_roles()).write_only())
                    .route(web::get().to(list_devlogs))
                    .route(web::post().to(create_devlog)),
            )
            .route("/{id}/", web::get().to(get_devlog)),
    );
}
