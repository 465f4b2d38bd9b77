//! Swagger UI 页面，模板通过 rust-embed 嵌入

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use rust_embed::Embed;

use super::SchemaService;
use crate::models::{ApiResponse, ErrorCode};
use crate::routes::urls::reverse;

#[derive(Embed)]
#[folder = "assets/"]
struct SchemaAssets;

const TEMPLATE: &str = "swagger-ui.html";

/// 替换模板中的占位符
fn render(template: &[u8], title: &str, schema_url: &str) -> String {
    String::from_utf8_lossy(template)
        .replace("%TITLE%", title)
        .replace("%SCHEMA_URL%", schema_url)
}

pub async fn get_swagger_ui(
    service: &SchemaService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let (Some(file), Some(schema_url)) = (SchemaAssets::get(TEMPLATE), reverse("schema", &[]))
    else {
        return Ok(
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                "Swagger UI template is missing",
            )),
        );
    };

    let html = render(&file.data, &service.get_config().app.system_name, &schema_url);
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_template_is_embedded() {
        assert!(SchemaAssets::get(TEMPLATE).is_some());
    }

    #[test]
    fn test_render_points_at_schema() {
        let file = SchemaAssets::get(TEMPLATE).unwrap();
        let html = render(&file.data, "KUETx", "/api/schema/");
        assert!(html.contains("url: \"/api/schema/\""));
        assert!(html.contains("<title>KUETx API</title>"));
        assert!(!html.contains('%'));
    }
}
