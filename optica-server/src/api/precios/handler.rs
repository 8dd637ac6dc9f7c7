//! Price catalog handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Precio, PrecioCreate, PrecioUpdate};

use crate::db::precios;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Precio>>> {
    Ok(Json(precios::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Precio>> {
    let precio = precios::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PrecioNotFound))?;
    Ok(Json(precio))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PrecioCreate>,
) -> AppResult<Json<Precio>> {
    Ok(Json(precios::create(&state.pool, &payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PrecioUpdate>,
) -> AppResult<Json<Precio>> {
    Ok(Json(precios::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    precios::delete(&state.pool, id).await?;
    Ok(Json(true))
}
