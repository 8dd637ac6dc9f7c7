//! Lens handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Lente, LenteCreate, LenteUpdate, Rol};

use crate::auth::CurrentUser;
use crate::db::lentes;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Lente>>> {
    Ok(Json(lentes::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Lente>> {
    let lente = lentes::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LenteNotFound))?;
    Ok(Json(lente))
}

/// An optometrist recording an exam is the default examiner
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<LenteCreate>,
) -> AppResult<Json<Lente>> {
    let optometrista = match user.rol {
        Rol::Optometrista => user.idempleado,
        _ => None,
    };
    let lente = lentes::create(&state.pool, &payload, optometrista).await?;
    tracing::info!(idlente = lente.idlente, folio = %lente.folio, "Lens recorded");
    Ok(Json(lente))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<LenteUpdate>,
) -> AppResult<Json<Lente>> {
    Ok(Json(lentes::update(&state.pool, id, &payload).await?))
}

pub async fn delete(State(state): State<AppState>, Path(id): Path<i64>) -> AppResult<Json<bool>> {
    lentes::delete(&state.pool, id).await?;
    Ok(Json(true))
}
