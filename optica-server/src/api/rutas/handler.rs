//! Route handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Entrega, GastoRuta, NoEntregadosInput, Ruta, RutaCreate, RutaResumen, RutaUpdate,
};

use crate::api::{empleado_de, ruta_propia};
use crate::auth::CurrentUser;
use crate::db::{entregas, gastos_ruta, rutas};
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Ruta>>> {
    Ok(Json(rutas::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Ruta>> {
    let ruta = rutas::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| rutas::ruta_not_found(id))?;
    Ok(Json(ruta))
}

/// Caller's route in progress
pub async fn activa(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<Ruta>> {
    let idasesor = empleado_de(&user)?;
    let ruta = rutas::find_activa(&state.pool, idasesor)
        .await?
        .ok_or_else(|| AppError::with_message(ErrorCode::RutaNotFound, "No active route"))?;
    Ok(Json(ruta))
}

/// Start a route; only admins may start one for another advisor
pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<RutaCreate>,
) -> AppResult<Json<Ruta>> {
    let idasesor = match payload.idasesor {
        Some(id) if user.is_admin() || user.idempleado == Some(id) => id,
        Some(_) => {
            return Err(AppError::with_message(
                ErrorCode::PermissionDenied,
                "Cannot start a route for another advisor",
            ));
        }
        None => empleado_de(&user)?,
    };
    Ok(Json(rutas::create(&state.pool, idasesor, &payload).await?))
}

pub async fn update(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<RutaUpdate>,
) -> AppResult<Json<Ruta>> {
    let ruta = rutas::update(&state.pool, id, &payload).await?;
    tracing::info!(idruta = id, by = admin.idusuario, "Route corrected");
    Ok(Json(ruta))
}

pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    rutas::delete(&state.pool, id).await?;
    tracing::info!(idruta = id, by = admin.idusuario, "Route deleted");
    Ok(Json(true))
}

pub async fn no_entregados(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<NoEntregadosInput>,
) -> AppResult<Json<Ruta>> {
    ruta_propia(&state, &user, id).await?;
    Ok(Json(
        rutas::registrar_no_entregados(&state.pool, id, &payload).await?,
    ))
}

pub async fn finalizar(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Ruta>> {
    ruta_propia(&state, &user, id).await?;
    Ok(Json(rutas::finalizar(&state.pool, id).await?))
}

pub async fn resumen(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<RutaResumen>> {
    Ok(Json(rutas::resumen(&state.pool, id).await?))
}

pub async fn list_gastos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<GastoRuta>>> {
    Ok(Json(gastos_ruta::list_by_ruta(&state.pool, id).await?))
}

pub async fn list_entregas(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Vec<Entrega>>> {
    Ok(Json(entregas::list_by_ruta(&state.pool, id).await?))
}
