#[macro_use]
mod common;

use actix_web::{http::StatusCode, test};
use serde_json::json;

use common::{PASSWORD, TestContext, access_token, bearer, json_body, link_path};
use kuetx_backend::models::ErrorCode;
use kuetx_backend::models::users::entities::{UserRole, UserStatus};
use kuetx_backend::models::users::requests::UpdateUserRequest;
use kuetx_backend::storage::Storage;
use kuetx_backend::utils::jwt::JwtUtils;

const IP: (&str, &str) = ("X-Forwarded-For", "10.30.0.1");
const RESET_IP: (&str, &str) = ("X-Forwarded-For", "10.30.0.2");

#[actix_web::test]
async fn test_register_verify_login_refresh_logout() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    // 注册
    let req = test::TestRequest::post()
        .uri("/register/")
        .insert_header(IP)
        .set_json(json!({
            "username": "alice_k",
            "email": "alice@Example.COM",
            "password": PASSWORD,
            "profile_name": "Alice"
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body = json_body(resp).await;
    assert_eq!(body["data"]["status"], "inactive");
    assert_eq!(body["data"]["email"], "alice@example.com");
    assert!(body["data"].get("password_hash").is_none());

    // 重复注册
    let req = test::TestRequest::post()
        .uri("/register/")
        .insert_header(IP)
        .set_json(json!({
            "username": "alice_k",
            "email": "other@example.com",
            "password": PASSWORD
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);

    // 未验证邮箱不能登录
    let req = test::TestRequest::post()
        .uri("/login/")
        .insert_header(IP)
        .set_json(json!({ "username": "alice_k", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(resp).await["code"], ErrorCode::AccountInactive.as_i32());

    // 篡改的链接无效
    let email = ctx.mailer.last_to("alice@example.com").expect("verification email");
    let link = link_path(&email.body, "/verify-email/");
    let tampered = format!("{}x/", link.trim_end_matches('/'));
    let req = test::TestRequest::get().uri(&tampered).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri(&link).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["status"], "active");

    let req = test::TestRequest::get().uri(&link).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["message"], "Email already verified");

    // 用注册时的大小写混合邮箱登录
    let req = test::TestRequest::post()
        .uri("/login/")
        .insert_header(IP)
        .set_json(json!({ "username": " alice@Example.COM ", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let access = body["data"]["access"].as_str().unwrap().to_string();
    let refresh = body["data"]["refresh"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["user"]["username"], "alice_k");

    let req = test::TestRequest::get()
        .uri("/users/me/")
        .insert_header(bearer(&access))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(json_body(resp).await["data"]["username"], "alice_k");

    // access token 不能用于刷新
    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(IP)
        .set_json(json!({ "refresh": access }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 轮换
    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(IP)
        .set_json(json!({ "refresh": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    let rotated = body["data"]["refresh"].as_str().unwrap().to_string();
    assert_ne!(rotated, refresh);

    // 旧令牌已失效
    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(IP)
        .set_json(json!({ "refresh": refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // 登出后轮换得到的令牌也失效
    let req = test::TestRequest::post()
        .uri("/logout/")
        .insert_header(bearer(&access))
        .set_json(json!({ "refresh": rotated }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(IP)
        .set_json(json!({ "refresh": rotated }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(resp).await["code"], ErrorCode::TokenInvalid.as_i32());
}

#[actix_web::test]
async fn test_obtain_token_pair() {
    let ctx = TestContext::new().await;
    ctx.create_user("bob_token", UserRole::Student)
        .await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/token/")
        .insert_header(("X-Forwarded-For", "10.30.0.3"))
        .set_json(json!({ "username": "bob_token", "password": "wrong-password" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/token/")
        .insert_header(("X-Forwarded-For", "10.30.0.3"))
        .set_json(json!({ "username": "bob_token", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert!(body["data"]["access"].is_string());
    assert!(body["data"]["refresh"].is_string());
}

#[actix_web::test]
async fn test_password_reset_flow() {
    let ctx = TestContext::new().await;
    ctx.create_user("carol_r", UserRole::Student)
        .await;
    let app = init_app!(ctx);

    // 未知邮箱同样返回 200，且不发邮件
    let req = test::TestRequest::post()
        .uri("/request-reset-password/")
        .insert_header(RESET_IP)
        .set_json(json!({ "email": "nobody@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(ctx.mailer.outbox().is_empty());

    let req = test::TestRequest::post()
        .uri("/request-reset-password/")
        .insert_header(RESET_IP)
        .set_json(json!({ "email": "carol_r@example.com" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let email = ctx.mailer.last_to("carol_r@example.com").expect("reset email");
    let link = link_path(&email.body, "/reset-password/");

    // 两次密码不一致
    let req = test::TestRequest::post()
        .uri(&link)
        .insert_header(RESET_IP)
        .set_json(json!({ "password": "Quiet-River-2024", "confirm_password": "Quiet-River-2025" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["code"], ErrorCode::PasswordMismatch.as_i32());

    let req = test::TestRequest::post()
        .uri(&link)
        .insert_header(RESET_IP)
        .set_json(json!({ "password": "Quiet-River-2024", "confirm_password": "Quiet-River-2024" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    // 链接只能使用一次
    let req = test::TestRequest::post()
        .uri(&link)
        .insert_header(RESET_IP)
        .set_json(json!({ "password": "Another-Path-77", "confirm_password": "Another-Path-77" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(resp).await["code"], ErrorCode::ResetLinkInvalid.as_i32());

    let req = test::TestRequest::post()
        .uri("/login/")
        .insert_header(RESET_IP)
        .set_json(json!({ "username": "carol_r", "password": "Quiet-River-2024" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

async fn set_status(ctx: &TestContext, user_id: i64, status: UserStatus) {
    ctx.storage
        .update_user(
            user_id,
            UpdateUserRequest {
                status: Some(status),
                ..Default::default()
            },
        )
        .await
        .expect("update status")
        .expect("user exists");
}

#[actix_web::test]
async fn test_suspended_account_is_rejected() {
    let ctx = TestContext::new().await;
    let user = ctx.create_user("dave_susp", UserRole::Student).await;
    set_status(&ctx, user.id, UserStatus::Suspended).await;
    let app = init_app!(ctx);

    for uri in ["/login/", "/token/"] {
        let req = test::TestRequest::post()
            .uri(uri)
            .insert_header(("X-Forwarded-For", "10.30.0.4"))
            .set_json(json!({ "username": "dave_susp", "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::FORBIDDEN, "{uri}");
        assert_eq!(json_body(resp).await["code"], ErrorCode::AccountSuspended.as_i32());
    }
}

#[actix_web::test]
async fn test_refresh_requires_existing_active_user() {
    let ctx = TestContext::new().await;
    let erin = ctx.create_user("erin_gone", UserRole::Student).await;
    let frank = ctx.create_user("frank_off", UserRole::Student).await;
    let app = init_app!(ctx);
    let ip = ("X-Forwarded-For", "10.30.0.5");

    let mut refresh_tokens = Vec::new();
    for username in ["erin_gone", "frank_off"] {
        let req = test::TestRequest::post()
            .uri("/token/")
            .insert_header(ip)
            .set_json(json!({ "username": username, "password": PASSWORD }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        refresh_tokens.push(body["data"]["refresh"].as_str().unwrap().to_string());
    }

    assert!(ctx.storage.delete_user(erin.id).await.unwrap());
    set_status(&ctx, frank.id, UserStatus::Inactive).await;

    for refresh in &refresh_tokens {
        let req = test::TestRequest::post()
            .uri("/token/refresh/")
            .insert_header(ip)
            .set_json(json!({ "refresh": refresh }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(resp).await["code"], ErrorCode::TokenInvalid.as_i32());
    }
}

#[actix_web::test]
async fn test_remember_me_lifetime_survives_rotation() {
    let ctx = TestContext::new().await;
    ctx.create_user("gina_long", UserRole::Student).await;
    let app = init_app!(ctx);
    let ip = ("X-Forwarded-For", "10.30.0.6");
    let lifetime = |token: &str| {
        let claims = JwtUtils::verify_refresh_token(token).expect("refresh claims");
        (claims.exp - claims.iat) as i64
    };
    let long = JwtUtils::refresh_token_lifetime(true).num_seconds();
    let short = JwtUtils::refresh_token_lifetime(false).num_seconds();
    assert!(long > short);

    let mut issued = Vec::new();
    for remember_me in [false, true] {
        let req = test::TestRequest::post()
            .uri("/login/")
            .insert_header(ip)
            .set_json(json!({
                "username": "gina_long",
                "password": PASSWORD,
                "remember_me": remember_me
            }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body = json_body(resp).await;
        issued.push(body["data"]["refresh"].as_str().unwrap().to_string());
    }
    assert_eq!(lifetime(&issued[0]), short);
    assert_eq!(lifetime(&issued[1]), long);

    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(ip)
        .set_json(json!({ "refresh": issued[1] }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let rotated = json_body(resp).await["data"]["refresh"]
        .as_str()
        .unwrap()
        .to_string();
    assert_eq!(lifetime(&rotated), long);
}

#[actix_web::test]
async fn test_register_is_rate_limited() {
    let ctx = TestContext::new().await;
    let app = init_app!(ctx);

    // 前三次进入处理函数（请求体无效返回 400），第四次被限流
    for _ in 0..3 {
        let req = test::TestRequest::post()
            .uri("/register/")
            .insert_header(("X-Forwarded-For", "10.30.0.7"))
            .set_json(json!({}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    let req = test::TestRequest::post()
        .uri("/register/")
        .insert_header(("X-Forwarded-For", "10.30.0.7"))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let retry_after: u64 = resp
        .headers()
        .get("Retry-After")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
        .expect("Retry-After header");
    assert!((1..=60).contains(&retry_after));
    assert_eq!(json_body(resp).await["code"], ErrorCode::RateLimitExceeded.as_i32());
}

#[actix_web::test]
async fn test_logout_ignores_foreign_refresh_token() {
    let ctx = TestContext::new().await;
    let hank = ctx.create_user("hank_own", UserRole::Student).await;
    ctx.create_user("iris_other", UserRole::Student).await;
    let app = init_app!(ctx);
    let ip = ("X-Forwarded-For", "10.30.0.8");

    let req = test::TestRequest::post()
        .uri("/token/")
        .insert_header(ip)
        .set_json(json!({ "username": "iris_other", "password": PASSWORD }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    let iris_refresh = json_body(resp).await["data"]["refresh"]
        .as_str()
        .unwrap()
        .to_string();

    // hank 登出时提交 iris 的令牌，不应使其失效
    let req = test::TestRequest::post()
        .uri("/logout/")
        .insert_header(bearer(&access_token(&hank)))
        .set_json(json!({ "refresh": iris_refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::post()
        .uri("/token/refresh/")
        .insert_header(ip)
        .set_json(json!({ "refresh": iris_refresh }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
