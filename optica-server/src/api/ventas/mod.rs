//! Sale routes, keyed by folio (any authenticated role)

mod handler;

use axum::{Router, routing::get};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().nest("/api/ventas", routes())
}

fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{folio}",
            get(handler::get_by_folio)
                .put(handler::update)
                .delete(handler::delete),
        )
        .route("/{folio}/pagos", get(handler::list_pagos))
        .route("/{folio}/lentes", get(handler::list_lentes))
}
