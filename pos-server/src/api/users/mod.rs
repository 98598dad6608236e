//! Customer API module

pub mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/user", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/create-user", post(handler::create_user))
        .route("/login-user", post(handler::login_user))
        .route("/", get(handler::list))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
