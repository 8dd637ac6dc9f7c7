//! Route expense handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{GastoRuta, GastoRutaCreate, GastoRutaUpdate};

use crate::api::ruta_propia;
use crate::auth::CurrentUser;
use crate::db::gastos_ruta;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<GastoRuta>>> {
    Ok(Json(gastos_ruta::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<GastoRuta>> {
    let gasto = gastos_ruta::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GastoNotFound))?;
    Ok(Json(gasto))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<GastoRutaCreate>,
) -> AppResult<Json<GastoRuta>> {
    ruta_propia(&state, &user, payload.idruta).await?;
    let gasto = gastos_ruta::create(&state.pool, &payload).await?;
    tracing::info!(
        idgasto = gasto.idgasto,
        idruta = gasto.idruta,
        monto = %gasto.monto,
        "Route expense recorded"
    );
    Ok(Json(gasto))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<GastoRutaUpdate>,
) -> AppResult<Json<GastoRuta>> {
    let gasto = gastos_ruta::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GastoNotFound))?;
    ruta_propia(&state, &user, gasto.idruta).await?;
    Ok(Json(gastos_ruta::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    gastos_ruta::delete(&state.pool, id).await?;
    Ok(Json(true))
}
