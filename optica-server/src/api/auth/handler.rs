//! Session handlers

use std::time::Duration;

use axum::{Json, extract::State, response::IntoResponse};
use http::header::SET_COOKIE;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{LoginRequest, LoginResponse, Usuario};

use crate::auth::{CurrentUser, cookie};
use crate::db;
use crate::state::AppState;
use crate::util::verify_password;

/// Fixed delay before answering, so timing does not reveal which emails exist
const AUTH_FIXED_DELAY_MS: u64 = 300;

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let correo = req.correo.trim().to_lowercase();
    let credenciales = db::usuarios::find_credentials(&state.pool, &correo).await?;

    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let Some(credenciales) = credenciales else {
        security_log!(WARN, "login_failed", correo = %correo, reason = "unknown_user");
        return Err(AppError::invalid_credentials());
    };
    if !verify_password(&req.password, &credenciales.password_hash) {
        security_log!(WARN, "login_failed", correo = %correo, reason = "bad_password");
        return Err(AppError::invalid_credentials());
    }

    let usuario = credenciales.usuario;
    if !usuario.activo {
        security_log!(WARN, "login_disabled", idusuario = usuario.idusuario);
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let token = state.jwt.generate_token(&usuario).map_err(|e| {
        tracing::error!(error = %e, "Failed to issue session token");
        AppError::internal("Failed to issue session token")
    })?;
    let expires_in = state.jwt.ttl_seconds();

    tracing::info!(
        idusuario = usuario.idusuario,
        correo = %usuario.correo,
        rol = %usuario.rol,
        "User logged in"
    );

    let set_cookie = cookie::session_cookie(&token, expires_in, state.cookie_secure);
    Ok((
        [(SET_COOKIE, set_cookie)],
        Json(LoginResponse {
            usuario,
            expires_in,
        }),
    ))
}

pub async fn logout(State(state): State<AppState>, user: CurrentUser) -> impl IntoResponse {
    tracing::info!(idusuario = user.idusuario, "User logged out");
    (
        [(SET_COOKIE, cookie::clear_cookie(state.cookie_secure))],
        Json(true),
    )
}

/// Current account, re-read so deactivation shows immediately
pub async fn me(State(state): State<AppState>, user: CurrentUser) -> AppResult<Json<Usuario>> {
    let usuario = db::usuarios::find_by_id(&state.pool, user.idusuario)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UsuarioNotFound))?;
    if !usuario.activo {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }
    Ok(Json(usuario))
}
