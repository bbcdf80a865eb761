use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use quizz_core::health::{healthz, readiness};
use quizz_core::middleware::{propagate_request_id_layer, request_id_layer};

use crate::handlers::auth::{
    forgot_password, login, refresh_token, register, reset_password, update_password, verify,
};
use crate::state::AppState;

async fn readyz(State(state): State<AppState>) -> StatusCode {
    readiness(state.db.ping().await)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Sessions
        .route("/login", post(login))
        .route("/token", get(refresh_token))
        // Registration
        .route("/register", post(register))
        .route("/verify", post(verify))
        // Passwords
        .route("/forgot", post(forgot_password))
        .route("/reset", post(reset_password))
        .route("/password/update", put(update_password))
        .layer(TraceLayer::new_for_http())
        .layer(propagate_request_id_layer())
        .layer(request_id_layer())
        .with_state(state)
}
