//! User account handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Usuario, UsuarioCreate, UsuarioUpdate};

use crate::auth::CurrentUser;
use crate::db::usuarios;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Usuario>>> {
    Ok(Json(usuarios::list(&state.pool).await?))
}

pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Usuario>> {
    let usuario = usuarios::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UsuarioNotFound))?;
    Ok(Json(usuario))
}

pub async fn create(
    State(state): State<AppState>,
    admin: CurrentUser,
    Json(payload): Json<UsuarioCreate>,
) -> AppResult<Json<Usuario>> {
    let usuario = usuarios::create(&state.pool, &payload).await?;
    tracing::info!(
        idusuario = usuario.idusuario,
        rol = %usuario.rol,
        by = admin.idusuario,
        "User created"
    );
    Ok(Json(usuario))
}

pub async fn update(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
    Json(payload): Json<UsuarioUpdate>,
) -> AppResult<Json<Usuario>> {
    // An admin cannot lock themselves out
    if id == admin.idusuario
        && (payload.activo == Some(false) || payload.rol.is_some_and(|r| !r.is_admin()))
    {
        return Err(AppError::with_message(
            ErrorCode::CannotDeleteSelf,
            "Cannot deactivate or demote your own account",
        ));
    }
    let usuario = usuarios::update(&state.pool, id, &payload).await?;
    tracing::info!(idusuario = id, by = admin.idusuario, "User updated");
    Ok(Json(usuario))
}

pub async fn delete(
    State(state): State<AppState>,
    admin: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if id == admin.idusuario {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }
    usuarios::delete(&state.pool, id).await?;
    security_log!(INFO, "user_deleted", idusuario = id, by = admin.idusuario);
    Ok(Json(true))
}
