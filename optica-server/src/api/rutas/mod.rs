//! Route lifecycle routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/rutas | GET, POST | session |
//! | /api/rutas/activa | GET | session (caller's route) |
//! | /api/rutas/{id} | GET | session |
//! | /api/rutas/{id} | PUT, DELETE | admin |
//! | /api/rutas/{id}/no-entregados | POST | owner or admin |
//! | /api/rutas/{id}/finalizar | POST | owner or admin |
//! | /api/rutas/{id}/resumen | GET | session |
//! | /api/rutas/{id}/gastos | GET | session |
//! | /api/rutas/{id}/entregas | GET | session |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::auth::require_admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/rutas", routes())
}

fn routes() -> Router<AppState> {
    let open_routes = Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route("/activa", get(handler::activa))
        .route("/{id}", get(handler::get_by_id))
        .route("/{id}/no-entregados", post(handler::no_entregados))
        .route("/{id}/finalizar", post(handler::finalizar))
        .route("/{id}/resumen", get(handler::resumen))
        .route("/{id}/gastos", get(handler::list_gastos))
        .route("/{id}/entregas", get(handler::list_entregas));

    let manage_routes = Router::new()
        .route("/{id}", put(handler::update).delete(handler::delete))
        .layer(middleware::from_fn(require_admin));

    open_routes.merge(manage_routes)
}
