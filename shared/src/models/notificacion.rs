//! Notification Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::Rol;

/// Stored notification (one row per recipient)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Notificacion {
    pub idnotificacion: i64,
    pub idremitente: i64,
    pub iddestinatario: i64,
    pub mensaje: String,
    pub fecha: NaiveDateTime,
    pub leida: bool,
}

/// Edit/delete request sent by field staff to every admin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificacionCreate {
    pub mensaje: String,
}

/// Payload of the `nueva_notificacion` realtime event
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificacionEvento {
    pub idnotificacion: i64,
    pub mensaje: String,
    pub fecha: NaiveDateTime,
    pub remitente_correo: String,
    pub remitente_rol: Rol,
}
