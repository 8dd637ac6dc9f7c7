//! Delivery handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Entrega, EntregaCreate, EntregaUpdate};

use crate::api::ruta_propia;
use crate::auth::CurrentUser;
use crate::db::entregas;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Entrega>>> {
    Ok(Json(entregas::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Entrega>> {
    let entrega = entregas::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EntregaNotFound))?;
    Ok(Json(entrega))
}

/// Record a delivery on the caller's active route
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<EntregaCreate>,
) -> AppResult<Json<Entrega>> {
    ruta_propia(&state, &user, payload.idruta).await?;
    Ok(Json(
        entregas::create(&state.pool, &payload, user.idempleado).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<EntregaUpdate>,
) -> AppResult<Json<Entrega>> {
    let entrega = entregas::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EntregaNotFound))?;
    ruta_propia(&state, &user, entrega.idruta).await?;
    Ok(Json(entregas::update(&state.pool, id, &payload).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    entregas::delete(&state.pool, id).await?;
    tracing::info!(identrega = id, by = admin.idusuario, "Delivery deleted");
    Ok(Json(true))
}
