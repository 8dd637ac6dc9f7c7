//! Extractor for the authenticated caller

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::error::AppError;

use crate::auth::{CurrentUser, cookie, middleware::authenticate};
use crate::state::AppState;

/// Handlers take `CurrentUser` directly; the value injected by
/// `require_auth` is reused when present.
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let Some(token) = cookie::token_from_headers(&parts.headers) else {
            security_log!(WARN, "auth_missing", uri = %parts.uri);
            return Err(AppError::unauthorized());
        };

        let user = authenticate(state, &token)?;
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}
