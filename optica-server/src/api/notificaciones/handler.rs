//! Notification handlers
//!
//! `create` stores one row per admin, then pushes a `nueva_notificacion`
//! event to each admin's live room. Admins without an open socket see the
//! row next time they list.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::error::AppResult;
use shared::models::{Notificacion, NotificacionCreate, NotificacionEvento};
use shared::realtime::ServerEvent;

use crate::auth::CurrentUser;
use crate::db::notificaciones;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Json<Vec<Notificacion>>> {
    Ok(Json(
        notificaciones::list_for(&state.pool, user.idusuario).await?,
    ))
}

pub async fn create(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<NotificacionCreate>,
) -> AppResult<Json<Vec<Notificacion>>> {
    let creadas =
        notificaciones::create_for_admins(&state.pool, user.idusuario, &payload.mensaje).await?;

    let mut entregadas = 0;
    for n in &creadas {
        let evento = ServerEvent::NuevaNotificacion(NotificacionEvento {
            idnotificacion: n.idnotificacion,
            mensaje: n.mensaje.clone(),
            fecha: n.fecha,
            remitente_correo: user.correo.clone(),
            remitente_rol: user.rol,
        });
        entregadas += state.hub.publish(n.iddestinatario, evento);
    }

    tracing::info!(
        idremitente = user.idusuario,
        destinatarios = creadas.len(),
        sesiones = entregadas,
        "Notification sent to admins"
    );
    Ok(Json(creadas))
}

pub async fn mark_read(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<Notificacion>> {
    Ok(Json(
        notificaciones::mark_read(&state.pool, id, user.idusuario).await?,
    ))
}

pub async fn delete(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    notificaciones::delete(&state.pool, id, user.idusuario).await?;
    Ok(Json(true))
}
