use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::services::SchemaService;

static SCHEMA_SERVICE: Lazy<SchemaService> = Lazy::new(SchemaService::new_lazy);

pub async fn schema(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEMA_SERVICE.schema(&req).await
}

pub async fn swagger_ui(req: HttpRequest) -> ActixResult<HttpResponse> {
    SCHEMA_SERVICE.swagger_ui(&req).await
}

pub fn configure_schema_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/schema")
            .route("/", web::get().to(schema))
            .route("/swagger-ui/", web::get().to(swagger_ui)),
    );
}
