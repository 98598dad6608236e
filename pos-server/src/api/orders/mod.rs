//! Order API module

pub mod handler;

use axum::{
    Router,
    routing::{delete, get, patch},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/v1/order", routes())
}

fn routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/order-list/today", get(handler::today))
        .route("/update_item/{id}", patch(handler::update_item))
        .route("/cancel/{id}", patch(handler::cancel))
        .route("/remove/{id}", delete(handler::delete))
        .route("/{id}", get(handler::get_by_id).delete(handler::delete))
}
