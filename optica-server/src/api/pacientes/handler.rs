//! Patient handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Paciente, PacienteCreate, PacienteUpdate};

use crate::db::pacientes;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Paciente>>> {
    Ok(Json(pacientes::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Paciente>> {
    let paciente = pacientes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PacienteNotFound))?;
    Ok(Json(paciente))
}

pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<PacienteCreate>,
) -> AppResult<Json<Paciente>> {
    Ok(Json(pacientes::create(&state.pool, &payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<PacienteUpdate>,
) -> AppResult<Json<Paciente>> {
    Ok(Json(pacientes::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    pacientes::delete(&state.pool, id).await?;
    Ok(Json(true))
}
