//! NotificationHub: per-user realtime rooms
//!
//! ```text
//! POST /api/notificaciones
//!       │ one row per admin
//!       ▼
//! NotificationHub
//!   └── rooms: idusuario → broadcast::Sender<ServerEvent>
//!         │
//!         ▼
//!   WS session (subscribe → forward as text frames)
//! ```
//!
//! No persistence or replay: events sent to a room with no subscribers are
//! dropped, offline users read `GET /api/notificaciones` instead.

use dashmap::DashMap;
use shared::realtime::ServerEvent;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Per-room buffer; a slower subscriber lags and is resubscribed
const ROOM_CAPACITY: usize = 64;

#[derive(Clone, Default)]
pub struct NotificationHub {
    rooms: Arc<DashMap<i64, broadcast::Sender<ServerEvent>>>,
}

impl NotificationHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join the room of `idusuario` (created on first join)
    pub fn subscribe(&self, idusuario: i64) -> broadcast::Receiver<ServerEvent> {
        self.rooms
            .entry(idusuario)
            .or_insert_with(|| broadcast::channel(ROOM_CAPACITY).0)
            .subscribe()
    }

    /// Emit to one room; returns how many sessions received it
    pub fn publish(&self, idusuario: i64, event: ServerEvent) -> usize {
        match self.rooms.get(&idusuario) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        }
    }

    /// Drop the room once its last session has gone
    pub fn release(&self, idusuario: i64) {
        self.rooms
            .remove_if(&idusuario, |_, tx| tx.receiver_count() == 0);
    }

    /// Users with at least one open session
    pub fn online(&self) -> Vec<i64> {
        self.rooms
            .iter()
            .filter(|room| room.value().receiver_count() > 0)
            .map(|room| *room.key())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use shared::models::{NotificacionEvento, Rol};

    fn evento(id: i64) -> ServerEvent {
        ServerEvent::NuevaNotificacion(NotificacionEvento {
            idnotificacion: id,
            mensaje: format!("Solicitud {id}"),
            fecha: NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            remitente_correo: "asesor@optica.mx".into(),
            remitente_rol: Rol::Asesor,
        })
    }

    #[tokio::test]
    async fn events_reach_only_their_room() {
        let hub = NotificationHub::new();
        let mut admin1 = hub.subscribe(1);
        let mut admin2 = hub.subscribe(2);

        assert_eq!(hub.publish(1, evento(10)), 1);

        assert_eq!(admin1.recv().await.unwrap(), evento(10));
        assert!(admin2.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_session_of_a_user_receives() {
        let hub = NotificationHub::new();
        let mut tab_a = hub.subscribe(5);
        let mut tab_b = hub.subscribe(5);

        assert_eq!(hub.publish(5, evento(1)), 2);
        assert_eq!(tab_a.recv().await.unwrap(), evento(1));
        assert_eq!(tab_b.recv().await.unwrap(), evento(1));
    }

    #[test]
    fn offline_user_is_dropped_silently() {
        let hub = NotificationHub::new();
        assert_eq!(hub.publish(99, evento(1)), 0);

        let rx = hub.subscribe(99);
        drop(rx);
        assert_eq!(hub.publish(99, evento(2)), 0);
    }

    #[test]
    fn release_keeps_rooms_with_sessions() {
        let hub = NotificationHub::new();
        let rx1 = hub.subscribe(1);
        let rx2 = hub.subscribe(2);
        drop(rx2);

        hub.release(1);
        hub.release(2);
        assert_eq!(hub.online(), vec![1]);
        drop(rx1);
        hub.release(1);
        assert!(hub.online().is_empty());
    }

    #[tokio::test]
    async fn lagging_subscriber_sees_lag_error() {
        let hub = NotificationHub::new();
        let mut rx = hub.subscribe(3);
        for i in 0..(ROOM_CAPACITY as i64 + 5) {
            hub.publish(3, evento(i));
        }
        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(5))
        ));
    }
}
