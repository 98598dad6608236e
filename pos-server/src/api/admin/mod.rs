//! Admin API module

pub mod handler;

use axum::{Router, routing::post};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/admin", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create-admin", post(handler::create_admin))
        .route("/login-admin", post(handler::login_admin))
        .route("/validate-token", post(handler::validate_token))
}
