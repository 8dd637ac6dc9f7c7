//! Dashboard report routes (admin only)

mod handler;

use axum::{Router, middleware, routing::get};

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest(
        "/api/reportes",
        Router::new()
            .route("/resumen", get(handler::resumen))
            .layer(middleware::from_fn(require_admin)),
    )
}
