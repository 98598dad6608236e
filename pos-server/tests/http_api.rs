//! HTTP surface tests
//!
//! Drives the assembled router in-process (no sockets) to cover route
//! wiring, the auth middleware, the response envelope and the
//! multipart normalization path.

use std::sync::Arc;

use axum::body::Body;
use http::{Request, StatusCode, header};
use tower::ServiceExt;

use pos_server::auth::{JwtConfig, JwtService};
use pos_server::core::{Config, ServerState, build_router};
use pos_server::db::DbService;
use pos_server::db::models::{User, UserCreate};
use pos_server::db::repository::UserRepository;
use pos_server::services::MediaService;

const BOUNDARY: &str = "XTESTBOUNDARY";

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: "an-integration-test-secret-of-sufficient-length".to_string(),
        access_expiry_minutes: 60,
        refresh_expiry_days: 7,
        issuer: "pos-server".to_string(),
        audience: "pos-clients".to_string(),
    }
}

async fn test_state(work_dir: &std::path::Path) -> ServerState {
    let db = DbService::memory().await.expect("in-memory db");
    let config = Config {
        work_dir: work_dir.to_string_lossy().into_owned(),
        http_port: 0,
        environment: "test".to_string(),
        cors_origin: None,
        jwt: test_jwt_config(),
        release_table_on_order_delete: false,
    };
    ServerState::new(
        config,
        db.db,
        Arc::new(JwtService::with_config(test_jwt_config())),
        MediaService::new(work_dir),
    )
}

fn bearer(state: &ServerState) -> String {
    let token = state
        .jwt_service
        .generate_access_token("user:tester", "Tester", "tester@x.com", "")
        .expect("token");
    format!("Bearer {token}")
}

fn multipart_body(fields: &[(&str, &str)]) -> Body {
    let mut body = String::new();
    for (name, value) in fields {
        body.push_str(&format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        ));
    }
    body.push_str(&format!("--{BOUNDARY}--\r\n"));
    Body::from(body)
}

async fn json_body(response: http::Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("json body")
}

#[tokio::test]
async fn welcome_and_health_are_public() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .clone()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn protected_routes_reject_anonymous_callers() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/user/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = json_body(response).await;
    assert_eq!(body["status"], false);
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn order_listing_stays_public() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let app = build_router(test_state(tmp.path()).await);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/v1/order/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["status"], true);
    assert_eq!(body["orders"], serde_json::json!([]));
}

#[tokio::test]
async fn dish_creation_normalizes_name_and_enums() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = test_state(tmp.path()).await;
    let auth = bearer(&state);
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/dish/")
                .header(header::AUTHORIZATION, auth.as_str())
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(multipart_body(&[
                    ("name", "Paneer Tikka"),
                    ("type", "Dinner"),
                    ("category", "vegetarian"),
                    ("price", "12.5"),
                    ("spice_level", "medium"),
                    ("ingredients", "paneer, yogurt, spices"),
                ]))
                .unwrap(),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = json_body(response).await;
    assert_eq!(body["status"], true);
    let dish = &body["dish"];
    assert_eq!(dish["name"], "paneer tikka");
    assert_eq!(dish["type"], "DINNER");
    assert_eq!(dish["category"], "VEGETARIAN");
    assert_eq!(dish["spice_level"], "MEDIUM");
    assert_eq!(dish["status"], "AVAILABLE");
    assert_eq!(dish["ingredients"].as_array().map(|a| a.len()), Some(3));

    // Round trip through the fetch path
    let id = dish["id"].as_str().expect("dish id").to_string();
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/v1/dish/{id}"))
                .header(header::AUTHORIZATION, auth.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["dish"]["name"], "paneer tikka");
}

#[tokio::test]
async fn duplicate_dish_names_conflict() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = test_state(tmp.path()).await;
    let auth = bearer(&state);
    let app = build_router(state);

    let request = |app: axum::Router| {
        app.oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/dish/")
                .header(header::AUTHORIZATION, auth.as_str())
                .header(
                    header::CONTENT_TYPE,
                    format!("multipart/form-data; boundary={BOUNDARY}"),
                )
                .body(multipart_body(&[
                    ("name", "Dal Makhani"),
                    ("type", "dinner"),
                    ("category", "vegan"),
                    ("price", "9.0"),
                ]))
                .unwrap(),
        )
    };

    let first = request(app.clone()).await.expect("request");
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = request(app).await.expect("request");
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body = json_body(second).await;
    assert_eq!(body["status"], false);
}

#[tokio::test]
async fn login_sets_the_token_cookie_pair() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = test_state(tmp.path()).await;
    let users = UserRepository::new(state.db.clone());
    users
        .create(UserCreate {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            contact_info: "+34 600 000 000".to_string(),
            hash_pass: Some(User::hash_password("s3cret").expect("hash")),
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 1,
            is_online: true,
        })
        .await
        .expect("seed user");

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/user/login-user")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"ana@x.com","password":"s3cret"}"#,
                ))
                .unwrap(),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::OK);

    let cookies: Vec<_> = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .collect();
    assert!(cookies.iter().any(|c| c.starts_with("access_token=")));
    assert!(cookies.iter().any(|c| c.starts_with("refresh_token=")));
    assert!(
        cookies.iter().all(|c| c.contains("HttpOnly")),
        "token cookies must be httpOnly: {cookies:?}"
    );

    let body = json_body(response).await;
    assert_eq!(body["status"], true);
    assert_eq!(body["message"], "Login successful");
}

#[tokio::test]
async fn wrong_password_is_unauthorized() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = test_state(tmp.path()).await;
    let users = UserRepository::new(state.db.clone());
    users
        .create(UserCreate {
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            contact_info: String::new(),
            hash_pass: Some(User::hash_password("s3cret").expect("hash")),
            profile_image: String::new(),
            profile_image_public_id: String::new(),
            total_person: 1,
            is_online: true,
        })
        .await
        .expect("seed user");

    let app = build_router(state);
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/user/login-user")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"email":"ana@x.com","password":"nope"}"#,
                ))
                .unwrap(),
        )
        .await
        .expect("request");

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn validate_token_accepts_good_and_rejects_bad() {
    let tmp = tempfile::tempdir().expect("tempdir");
    let state = test_state(tmp.path()).await;
    let auth = bearer(&state);
    let app = build_router(state);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/validate-token")
                .header(header::AUTHORIZATION, auth.as_str())
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["message"], "Valid Access Token");

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/admin/validate-token")
                .header(header::AUTHORIZATION, "Bearer not-a-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .expect("request");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
