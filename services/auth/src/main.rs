use std::net::SocketAddr;

use sea_orm::Database;
use tracing::info;

use quizz_auth::config::AuthConfig;
use quizz_auth::router::build_router;
use quizz_auth::state::AppState;
use quizz_auth_types::codec::TokenCodec;
use quizz_core::config::Config;
use quizz_core::tracing::init_tracing;

#[tokio::main]
async fn main() {
    init_tracing();

    let config = AuthConfig::from_env();

    let db = Database::connect(&config.database_url)
        .await
        .expect("failed to connect to database");

    let mailer = config.mailer();
    let state = AppState {
        db,
        tokens: config.token_service(TokenCodec::new(&config.jwt_secret)),
        policy: config.throttle_policy(),
        mailer,
    };

    let router = build_router(state);
    let addr = format!("0.0.0.0:{}", config.auth_port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind");

    info!(env = ?config.app_env, "auth service listening on {addr}");
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .expect("server error");
}
