//! Notification routes, scoped to the caller as recipient

mod handler;

use axum::{
    Router,
    routing::{delete, get, put},
};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/notificaciones", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/{id}", delete(handler::delete))
        .route("/{id}/leida", put(handler::mark_read))
}
