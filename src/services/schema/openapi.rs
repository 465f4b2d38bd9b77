//! 由命名路由表生成 OpenAPI 3.0.3 文档

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use serde_json::{Map, Value, json};

use super::SchemaService;
use crate::routes::urls::{AuthLevel, URL_PATTERNS, UrlPattern};

pub const OPENAPI_VERSION: &str = "3.0.3";
const SECURITY_SCHEME: &str = "bearerAuth";

// 数字 ID 参数
fn is_integer_param(name: &str) -> bool {
    name == "id" || name.ends_with("_id")
}

fn path_parameters(pattern: &UrlPattern) -> Vec<Value> {
    pattern
        .params()
        .into_iter()
        .map(|name| {
            let schema = if is_integer_param(name) {
                json!({ "type": "integer", "format": "int64", "minimum": 1 })
            } else {
                json!({ "type": "string" })
            };
            json!({
                "name": name,
                "in": "path",
                "required": true,
                "schema": schema,
            })
        })
        .collect()
}

fn operation(pattern: &UrlPattern) -> Value {
    let mut op = Map::new();
    op.insert("operationId".into(), json!(pattern.name));
    op.insert("summary".into(), json!(pattern.summary));
    op.insert("tags".into(), json!([pattern.tag]));

    let parameters = path_parameters(pattern);
    if !parameters.is_empty() {
        op.insert("parameters".into(), Value::Array(parameters));
    }

    if matches!(pattern.method, "POST" | "PUT") {
        op.insert(
            "requestBody".into(),
            json!({
                "required": false,
                "content": { "application/json": { "schema": { "type": "object" } } }
            }),
        );
    }

    let mut responses = Map::new();
    responses.insert(
        "200".into(),
        json!({
            "description": "Success",
            "content": {
                "application/json": {
                    "schema": { "$ref": "#/components/schemas/ApiResponse" }
                }
            }
        }),
    );
    if pattern.auth != AuthLevel::Public {
        op.insert("security".into(), json!([{ SECURITY_SCHEME: [] }]));
        responses.insert("401".into(), json!({ "description": "Authentication required" }));
        if matches!(pattern.auth, AuthLevel::Staff | AuthLevel::Admin) {
            responses.insert("403".into(), json!({ "description": "Insufficient role" }));
        }
    }
    op.insert("responses".into(), Value::Object(responses));

    Value::Object(op)
}

/// 生成完整文档
pub fn build_openapi_document(title: &str) -> Value {
    let mut paths = Map::new();
    for pattern in URL_PATTERNS {
        let item = paths
            .entry(pattern.path.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(methods) = item {
            methods.insert(pattern.method.to_ascii_lowercase(), operation(pattern));
        }
    }

    let mut tags: Vec<&str> = Vec::new();
    for pattern in URL_PATTERNS {
        if !tags.contains(&pattern.tag) {
            tags.push(pattern.tag);
        }
    }

    json!({
        "openapi": OPENAPI_VERSION,
        "info": {
            "title": format!("{title} API"),
            "version": env!("CARGO_PKG_VERSION"),
        },
        "tags": tags.into_iter().map(|name| json!({ "name": name })).collect::<Vec<_>>(),
        "paths": paths,
        "components": {
            "securitySchemes": {
                SECURITY_SCHEME: { "type": "http", "scheme": "bearer", "bearerFormat": "JWT" }
            },
            "schemas": {
                "ApiResponse": {
                    "type": "object",
                    "required": ["code", "message", "timestamp"],
                    "properties": {
                        "code": { "type": "integer" },
                        "message": { "type": "string" },
                        "data": {},
                        "timestamp": { "type": "string", "format": "date-time" }
                    }
                }
            }
        }
    })
}

pub async fn get_schema(
    service: &SchemaService,
    _request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let document = build_openapi_document(&service.get_config().app.system_name);
    Ok(HttpResponse::Ok().json(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_route_is_documented() {
        let doc = build_openapi_document("KUETx");
        assert_eq!(doc["openapi"], OPENAPI_VERSION);
        for pattern in URL_PATTERNS {
            let op = &doc["paths"][pattern.path][pattern.method.to_ascii_lowercase()];
            assert_eq!(op["operationId"], pattern.name, "{}", pattern.path);
        }
    }

    #[test]
    fn test_path_parameters() {
        let doc = build_openapi_document("KUETx");
        let params = doc["paths"]["/verify-email/{uidb64}/{token}/"]["get"]["parameters"]
            .as_array()
            .unwrap();
        let names: Vec<_> = params.iter().map(|p| p["name"].as_str().unwrap()).collect();
        assert_eq!(names, ["uidb64", "token"]);
        assert_eq!(params[0]["schema"]["type"], "string");

        let content = &doc["paths"]["/courses/contents/{content_id}/"]["put"]["parameters"][0];
        assert_eq!(content["schema"]["type"], "integer");
        assert!(doc["paths"]["/login/"]["post"].get("parameters").is_none());
    }

    #[test]
    fn test_security_on_protected_routes() {
        let doc = build_openapi_document("KUETx");
        assert!(doc["paths"]["/login/"]["post"].get("security").is_none());
        assert!(doc["paths"]["/dashboard/stats/"]["get"]["security"].is_array());
        assert!(doc["paths"]["/dashboard/stats/"]["get"]["responses"]["403"].is_object());
        assert!(doc["paths"]["/users/me/"]["get"]["responses"]["403"].is_null());
        assert_eq!(
            doc["components"]["securitySchemes"]["bearerAuth"]["scheme"],
            "bearer"
        );
    }

    #[test]
    fn test_shared_path_keeps_all_methods() {
        let doc = build_openapi_document("KUETx");
        let courses = doc["paths"]["/courses/"].as_object().unwrap();
        assert!(courses.contains_key("get"));
        assert!(courses.contains_key("post"));
    }
}
