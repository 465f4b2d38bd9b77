pub mod openapi;
pub mod swagger;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::config::AppConfig;

pub struct SchemaService;

impl SchemaService {
    pub fn new_lazy() -> Self {
        Self
    }

    pub(crate) fn get_config(&self) -> &AppConfig {
        AppConfig::get()
    }

    // OpenAPI JSON
    pub async fn schema(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        openapi::get_schema(self, request).await
    }

    pub async fn swagger_ui(&self, request: &HttpRequest) -> ActixResult<HttpResponse> {
        swagger::get_swagger_ui(self, request).await
    }
}
