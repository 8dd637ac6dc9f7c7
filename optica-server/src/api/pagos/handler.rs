//! Payment handlers
//!
//! The balance rules live in `services::ledger`; these only resolve the
//! caller and log.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Pago, PagoCreate, PagoUpdate};

use crate::auth::CurrentUser;
use crate::db::pagos;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Pago>>> {
    Ok(Json(pagos::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Pago>> {
    let pago = pagos::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PagoNotFound))?;
    Ok(Json(pago))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<PagoCreate>,
) -> AppResult<Json<Pago>> {
    let pago = pagos::create(&state.pool, &payload, user.idempleado).await?;
    tracing::info!(
        idpago = pago.idpago,
        folio = %pago.folio,
        monto = %pago.monto,
        idusuario = user.idusuario,
        "Payment created"
    );
    Ok(Json(pago))
}

pub async fn update(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<PagoUpdate>,
) -> AppResult<Json<Pago>> {
    let pago = pagos::update(&state.pool, id, &payload).await?;
    tracing::info!(
        idpago = id,
        monto = %pago.monto,
        estado = %pago.estado,
        by = admin.idusuario,
        "Payment updated"
    );
    Ok(Json(pago))
}

pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    pagos::delete(&state.pool, id).await?;
    tracing::info!(idpago = id, by = admin.idusuario, "Payment deleted");
    Ok(Json(true))
}
