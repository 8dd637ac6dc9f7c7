//! Sale handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use shared::error::AppResult;
use shared::models::{Lente, Pago, Venta, VentaCreate, VentaFiltro, VentaUpdate};

use crate::auth::CurrentUser;
use crate::db::{lentes, pagos, ventas};
use crate::state::AppState;

/// `GET /api/ventas?estado=&idcliente=`
pub async fn list(
    State(state): State<AppState>,
    Query(filtro): Query<VentaFiltro>,
) -> AppResult<Json<Vec<Venta>>> {
    Ok(Json(ventas::list(&state.pool, &filtro).await?))
}

pub async fn get_by_folio(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<Json<Venta>> {
    let venta = ventas::find_by_folio(&state.pool, &folio)
        .await?
        .ok_or_else(|| ventas::venta_not_found(&folio))?;
    Ok(Json(venta))
}

/// The advisor defaults to the caller's employee record
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<VentaCreate>,
) -> AppResult<Json<Venta>> {
    let venta = ventas::create(&state.pool, &payload, user.idempleado).await?;
    tracing::info!(
        folio = %venta.folio,
        total = %venta.total,
        idusuario = user.idusuario,
        "Sale created"
    );
    Ok(Json(venta))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(folio): Path<String>,
    Json(payload): Json<VentaUpdate>,
) -> AppResult<Json<Venta>> {
    let venta = ventas::update(&state.pool, &folio, &payload).await?;
    tracing::info!(
        folio = %venta.folio,
        estado = %venta.estado,
        idusuario = user.idusuario,
        "Sale updated"
    );
    Ok(Json(venta))
}

pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(folio): Path<String>,
) -> AppResult<Json<bool>> {
    ventas::delete(&state.pool, &folio).await?;
    tracing::info!(folio = %folio, idusuario = user.idusuario, "Sale deleted");
    Ok(Json(true))
}

pub async fn list_pagos(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<Json<Vec<Pago>>> {
    Ok(Json(pagos::list_by_folio(&state.pool, &folio).await?))
}

pub async fn list_lentes(
    State(state): State<AppState>,
    Path(folio): Path<String>,
) -> AppResult<Json<Vec<Lente>>> {
    Ok(Json(lentes::list_by_folio(&state.pool, &folio).await?))
}
