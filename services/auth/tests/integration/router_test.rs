use axum::body::{Body, to_bytes};
use http::{Request, StatusCode, header};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use quizz_auth::infra::mailer::AppMailer;
use quizz_auth::router::build_router;
use quizz_auth::state::AppState;
use quizz_core::config::Environment;

use crate::helpers::{policy, token_service};

// Requests below are rejected before any query runs, so no database is needed.
fn app() -> axum::Router {
    build_router(AppState {
        db: DatabaseConnection::Disconnected,
        tokens: token_service(Environment::Test),
        policy: policy(),
        mailer: AppMailer::Disabled,
    })
}

fn json_post(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(res: axum::response::Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn should_answer_liveness_with_request_id() {
    let res = app()
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn should_map_validation_failure_to_422() {
    let res = app()
        .oneshot(json_post(
            "/login",
            serde_json::json!({ "email": "not-an-email", "password": "secret1" }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = body_json(res).await;
    assert_eq!(body["kind"], "VALIDATION_FAILED");
    assert!(body["message"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn should_reject_short_password_on_register() {
    let res = app()
        .oneshot(json_post(
            "/register",
            serde_json::json!({
                "firstName": "A",
                "lastName": "B",
                "email": "a@b.com",
                "password": "abc"
            }),
        ))
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn should_require_token_for_refresh() {
    let res = app()
        .oneshot(Request::get("/token").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(res).await["kind"], "UNAUTHORIZED");
}

#[tokio::test]
async fn should_reject_undecodable_bearer() {
    let res = app()
        .oneshot(
            Request::get("/token")
                .header(header::AUTHORIZATION, "Bearer deadbeef")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);

    let res = app()
        .oneshot(
            Request::get("/token?token=zz")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
}
