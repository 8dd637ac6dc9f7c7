//! Employee handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Empleado, EmpleadoCreate, EmpleadoUpdate};

use crate::db::empleados;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Empleado>>> {
    Ok(Json(empleados::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Empleado>> {
    let empleado = empleados::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmpleadoNotFound))?;
    Ok(Json(empleado))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EmpleadoCreate>,
) -> AppResult<Json<Empleado>> {
    Ok(Json(empleados::create(&state.pool, &payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EmpleadoUpdate>,
) -> AppResult<Json<Empleado>> {
    Ok(Json(empleados::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    empleados::delete(&state.pool, id).await?;
    Ok(Json(true))
}
