//! Authentication middleware
//!
//! `require_auth` validates the session token for every `/api/` request and
//! injects [`CurrentUser`] into the request extensions. `require_admin`
//! gates `Matriz`-only routes and must run after it.
//!
//! Skipped paths:
//! - `OPTIONS *` (CORS preflight)
//! - non-`/api/` paths
//! - `/api/auth/login`
//! - `/api/ws` (authenticates itself, token may come in the query string)

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use shared::error::{AppError, ErrorCode};

use crate::auth::{CurrentUser, JwtError, cookie};
use crate::state::AppState;

const PUBLIC_API_ROUTES: &[&str] = &["/api/auth/login", "/api/ws"];

pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let path = req.uri().path();

    if req.method() == http::Method::OPTIONS
        || !path.starts_with("/api/")
        || PUBLIC_API_ROUTES.contains(&path)
    {
        return Ok(next.run(req).await);
    }

    let Some(token) = cookie::token_from_headers(req.headers()) else {
        security_log!(WARN, "auth_missing", uri = %req.uri());
        return Err(AppError::unauthorized());
    };

    let user = authenticate(&state, &token).inspect_err(|e| {
        security_log!(WARN, "auth_failed", error = %e, uri = %req.uri());
    })?;
    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

/// Validate a raw token into a [`CurrentUser`]
pub fn authenticate(state: &AppState, token: &str) -> Result<CurrentUser, AppError> {
    let claims = state.jwt.validate_token(token).map_err(|e| match e {
        JwtError::ExpiredToken => AppError::token_expired(),
        _ => AppError::invalid_token("Invalid token"),
    })?;
    CurrentUser::try_from(claims).map_err(|e| AppError::invalid_token(e.to_string()))
}

/// Admin gate: caller must hold the `Matriz` role
pub async fn require_admin(req: Request, next: Next) -> Result<Response, AppError> {
    let user = req
        .extensions()
        .get::<CurrentUser>()
        .ok_or(AppError::unauthorized())?;
    if !user.is_admin() {
        security_log!(
            WARN,
            "admin_required",
            idusuario = user.idusuario,
            correo = %user.correo,
            rol = %user.rol,
            uri = %req.uri()
        );
        return Err(AppError::new(ErrorCode::AdminRequired));
    }

    Ok(next.run(req).await)
}
