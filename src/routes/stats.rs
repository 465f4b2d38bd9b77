use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{RequireJWT, RequireRole};
use crate::models::users::entities::UserRole;
use crate::services::StatsService;

static STATS_SERVICE: Lazy<StatsService> = Lazy::new(StatsService::new_lazy);

pub async fn dashboard_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.dashboard_stats(&req).await
}

pub async fn landing_page_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    STATS_SERVICE.landing_page_stats(&req).await
}

pub fn configure_stats_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/dashboard/stats/")
            .wrap(RequireRole::new_any(UserRole::admin_roles()))
            .wrap(RequireJWT::default())
            .route(web::get().to(dashboard_stats)),
    )
    .route("/landingpage/stats/", web::get().to(landing_page_stats));
}
