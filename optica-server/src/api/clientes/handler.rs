//! Client handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Cliente, ClienteCreate, ClienteUpdate, Paciente};

use crate::db::{clientes, pacientes};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Cliente>>> {
    Ok(Json(clientes::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Cliente>> {
    let cliente = clientes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ClienteNotFound))?;
    Ok(Json(cliente))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<ClienteCreate>,
) -> AppResult<Json<Cliente>> {
    Ok(Json(clientes::create(&state.pool, &payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ClienteUpdate>,
) -> AppResult<Json<Cliente>> {
    Ok(Json(clientes::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    clientes::delete(&state.pool, id).await?;
    Ok(Json(true))
}

pub async fn list_pacientes(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Paciente>>> {
    if clientes::find_by_id(&state.pool, id).await?.is_none() {
        return Err(AppError::new(ErrorCode::ClienteNotFound));
    }
    Ok(Json(pacientes::list_by_cliente(&state.pool, id).await?))
}
