//! Session routes
//!
//! | Path | Method | Auth |
//! |------|--------|------|
//! | /api/auth/login | POST | none, rate limited per IP |
//! | /api/auth/logout | POST | session |
//! | /api/auth/me | GET | session |

mod handler;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::auth::rate_limit::login_rate_limit;
use crate::state::AppState;

pub fn router(state: &AppState) -> Router<AppState> {
    let login = Router::new()
        .route("/api/auth/login", post(handler::login))
        .layer(middleware::from_fn_with_state(state.clone(), login_rate_limit));

    Router::new()
        .route("/api/auth/logout", post(handler::logout))
        .route("/api/auth/me", get(handler::me))
        .merge(login)
}
