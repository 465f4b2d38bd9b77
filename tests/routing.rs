#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};

use common::{TestContext, json_body};
use kuetx_backend::models::ErrorCode;
use kuetx_backend::routes::urls::{URL_PATTERNS, reverse};

fn sample_arg(param: &str) -> &'static str {
    match param {
        "uidb64" => "MQ",
        "token" => "invalid-token",
        _ => "1",
    }
}

#[actix_web::test]
async fn test_every_named_route_is_mounted() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    for (i, pattern) in URL_PATTERNS.iter().enumerate() {
        let args: Vec<&str> = pattern.params().into_iter().map(sample_arg).collect();
        let path = reverse(pattern.name, &args).expect("reverse");
        let method = actix_web::http::Method::from_bytes(pattern.method.as_bytes()).unwrap();

        let req = test::TestRequest::default()
            .method(method)
            .uri(&path)
            .insert_header(("X-Forwarded-For", format!("10.20.0.{i}")))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        assert_ne!(status, StatusCode::METHOD_NOT_ALLOWED, "{} {}", pattern.method, path);

        if status == StatusCode::NOT_FOUND {
            let body = json_body(resp).await;
            assert_ne!(
                body["code"],
                ErrorCode::NotFound.as_i32(),
                "route '{}' is not mounted at {}",
                pattern.name,
                path
            );
        }
    }
}

#[actix_web::test]
async fn test_unknown_paths_return_404_envelope() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    for path in ["/nowhere/", "/login", "/courses/1/unknown/", "/api/schema/extra/"] {
        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{path}");
        let body = json_body(resp).await;
        assert_eq!(body["code"], ErrorCode::NotFound.as_i32());
        assert!(body["message"].as_str().unwrap().contains(path));
    }
}

#[actix_web::test]
async fn test_invalid_path_id_is_rejected() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/courses/abc/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["code"], ErrorCode::BadRequest.as_i32());
}

#[actix_web::test]
async fn test_huge_page_numbers_are_capped() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    for uri in [
        "/courses/?page=9223372036854775807&size=100",
        "/forum/posts/?page=9223372036854775807&size=100",
        "/devlogs/?page=9223372036854775807",
    ] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK, "{uri}");
        let body = json_body(resp).await;
        assert_eq!(body["data"]["items"].as_array().map(Vec::len), Some(0), "{uri}");
    }
}

#[actix_web::test]
async fn test_schema_and_swagger_ui() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/schema/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let doc = json_body(resp).await;
    assert_eq!(doc["openapi"], "3.0.3");
    assert_eq!(doc["paths"].as_object().unwrap().len(), {
        let mut paths: Vec<_> = URL_PATTERNS.iter().map(|p| p.path).collect();
        paths.sort();
        paths.dedup();
        paths.len()
    });

    let req = test::TestRequest::get().uri("/api/schema/swagger-ui/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let html = test::read_body(resp).await;
    let html = String::from_utf8_lossy(&html);
    assert!(html.contains("/api/schema/"));
    assert!(html.contains("swagger-ui"));
}

#[actix_web::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    for (method, path) in [
        ("GET", "/users/me/"),
        ("GET", "/dashboard/stats/"),
        ("POST", "/forum/posts/"),
        ("GET", "/quiz/categories/1/questions/"),
        ("POST", "/quiz/submit/"),
    ] {
        let req = test::TestRequest::default()
            .method(actix_web::http::Method::from_bytes(method.as_bytes()).unwrap())
            .uri(path)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED, "{method} {path}");
    }
}
