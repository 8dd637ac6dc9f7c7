//! Dashboard report handlers

use axum::{Json, extract::State};
use shared::error::AppResult;
use shared::models::ResumenGeneral;

use crate::db::reportes;
use crate::state::AppState;

pub async fn resumen(State(state): State<AppState>) -> AppResult<Json<ResumenGeneral>> {
    Ok(Json(reportes::resumen(&state.pool).await?))
}
