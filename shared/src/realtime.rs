//! Realtime events pushed over the notification WebSocket
//!
//! Wire shape: `{"event": "<name>", "data": {...}}`.

use serde::{Deserialize, Serialize};

use crate::models::NotificacionEvento;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// A field user asked an admin to edit or delete a record
    #[serde(rename = "nueva_notificacion")]
    NuevaNotificacion(NotificacionEvento),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Rol;
    use chrono::NaiveDate;

    #[test]
    fn event_wire_shape() {
        let fecha = NaiveDate::from_ymd_opt(2024, 5, 2)
            .unwrap()
            .and_hms_opt(10, 30, 0)
            .unwrap();
        let event = ServerEvent::NuevaNotificacion(NotificacionEvento {
            idnotificacion: 7,
            mensaje: "Eliminar pago 12 del folio A-3".into(),
            fecha,
            remitente_correo: "asesor@optica.mx".into(),
            remitente_rol: Rol::Asesor,
        });

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "nueva_notificacion");
        assert_eq!(json["data"]["idnotificacion"], 7);
        assert_eq!(json["data"]["remitente_rol"], "Asesor");
        assert_eq!(json["data"]["fecha"], "2024-05-02T10:30:00");

        let back: ServerEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
