//! Notification WebSocket
//!
//! GET /api/ws (session cookie) or /api/ws?token=<JWT>
//!
//! Server → client only: text frames carrying a [`ServerEvent`]. Client
//! frames other than close are ignored.

use axum::Router;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use futures::{SinkExt, StreamExt};
use http::HeaderMap;
use serde::Deserialize;
use shared::error::{AppError, AppResult};
use shared::realtime::ServerEvent;
use tokio::sync::broadcast;
use tokio::time::Duration;

use crate::auth::middleware::authenticate;
use crate::auth::{CurrentUser, cookie};
use crate::state::AppState;

const PING_INTERVAL: Duration = Duration::from_secs(30);

pub fn router() -> Router<AppState> {
    Router::new().route("/api/ws", get(handle_ws))
}

#[derive(Deserialize)]
pub struct WsAuthQuery {
    token: Option<String>,
}

pub async fn handle_ws(
    State(state): State<AppState>,
    Query(query): Query<WsAuthQuery>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> AppResult<impl IntoResponse> {
    // Browsers cannot set headers on a WebSocket; the query token covers that
    let token = cookie::token_from_headers(&headers)
        .or(query.token)
        .ok_or_else(AppError::unauthorized)?;
    let user = authenticate(&state, &token).inspect_err(|e| {
        security_log!(WARN, "ws_auth_failed", error = %e);
    })?;

    Ok(ws.on_upgrade(move |socket| ws_session(socket, state, user)))
}

async fn ws_session(socket: WebSocket, state: AppState, user: CurrentUser) {
    let idusuario = user.idusuario;
    let (mut sink, mut stream) = socket.split();
    let mut hub_rx = state.hub.subscribe(idusuario);

    tracing::info!(idusuario, rol = %user.rol, "Notification socket connected");

    let mut ping_interval = tokio::time::interval(PING_INTERVAL);
    ping_interval.tick().await; // skip immediate

    loop {
        tokio::select! {
            _ = ping_interval.tick() => {
                if sink.send(Message::Ping(Vec::new().into())).await.is_err() {
                    break;
                }
            }

            event = hub_rx.recv() => {
                match event {
                    Ok(event) => {
                        if send_event(&mut sink, &event).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(idusuario, lagged = n, "Notification subscriber lagged, resubscribing");
                        hub_rx = state.hub.subscribe(idusuario);
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }

            msg = stream.next() => {
                match msg {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(_)) => break,
                    _ => {}
                }
            }
        }
    }

    drop(hub_rx);
    state.hub.release(idusuario);
    tracing::info!(idusuario, "Notification socket disconnected");
}

async fn send_event<S>(sink: &mut S, event: &ServerEvent) -> Result<(), ()>
where
    S: futures::Sink<Message, Error = axum::Error> + Unpin,
{
    let json = serde_json::to_string(event).map_err(|_| ())?;
    sink.send(Message::Text(json.into())).await.map_err(|_| ())
}
