//! optica-server: back office for an optical retail business
//!
//! - REST API for clients, sales, lenses, payments and delivery routes
//! - Session cookie (JWT) auth with an admin role gate
//! - Live notification socket for admin edit/delete requests

/// Security audit events, logged under the `security` target
macro_rules! security_log {
    (WARN, $event:expr, $($arg:tt)*) => {
        tracing::warn!(target: "security", event = $event, $($arg)*)
    };
    (ERROR, $event:expr, $($arg:tt)*) => {
        tracing::error!(target: "security", event = $event, $($arg)*)
    };
    (INFO, $event:expr, $($arg:tt)*) => {
        tracing::info!(target: "security", event = $event, $($arg)*)
    };
}

mod api;
mod auth;
mod config;
mod db;
mod error;
mod live;
mod services;
mod state;
mod util;

use std::net::SocketAddr;
use std::time::Duration;

use config::Config;
use error::BoxError;
use state::AppState;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "optica_server=info,security=info,tower_http=info".into()),
        )
        .init();

    let config = Config::from_env()?;
    tracing::info!("Starting optica-server (env: {})", config.environment);

    let state = AppState::new(&config).await?;
    bootstrap_admin(&state, &config).await?;

    // Periodic rate limiter cleanup (every 5 minutes)
    let rate_limiter = state.rate_limiter.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(300));
        loop {
            interval.tick().await;
            rate_limiter.cleanup().await;
        }
    });

    let app = api::build_app(state, config.cors_origin.as_deref());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("optica-server listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("optica-server stopped");
    Ok(())
}

/// Create the first admin from `ADMIN_EMAIL` / `ADMIN_PASSWORD` on an empty install
async fn bootstrap_admin(state: &AppState, config: &Config) -> Result<(), BoxError> {
    let (Some(correo), Some(password)) = (&config.admin_email, &config.admin_password) else {
        if config.is_development() {
            tracing::debug!("ADMIN_EMAIL/ADMIN_PASSWORD not set, skipping admin bootstrap");
        }
        return Ok(());
    };

    let created = db::usuarios::ensure_admin(&state.pool, correo, password)
        .await
        .map_err(|e| -> BoxError {
            let e: shared::error::AppError = e.into();
            format!("Admin bootstrap failed: {}", e.message).into()
        })?;
    if created {
        security_log!(INFO, "admin_bootstrapped", correo = %correo);
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
