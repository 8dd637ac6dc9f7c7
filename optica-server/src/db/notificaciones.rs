//! Edit/delete requests addressed to admins

use shared::error::{AppError, ErrorCode};
use shared::models::{Notificacion, Usuario};
use sqlx::MySqlPool;

use crate::db::usuarios;
use crate::error::ServiceResult;

/// Maximum message length in characters
pub const MAX_MENSAJE: usize = 2000;

/// Stores one row per active admin other than `remitente`
///
/// Returns the stored rows so the caller can push them to live sessions.
pub async fn create_for_admins(
    pool: &MySqlPool,
    remitente: i64,
    mensaje: &str,
) -> ServiceResult<Vec<Notificacion>> {
    let mensaje = validar_mensaje(mensaje)?;
    let destinatarios: Vec<Usuario> = usuarios::list_active_admins(pool)
        .await?
        .into_iter()
        .filter(|u| u.idusuario != remitente)
        .collect();

    let fecha = shared::util::now();
    let mut tx = pool.begin().await?;
    let mut creadas = Vec::with_capacity(destinatarios.len());
    for destinatario in &destinatarios {
        let result = sqlx::query(
            r#"
            INSERT INTO notificaciones (idremitente, iddestinatario, mensaje, fecha, leida)
            VALUES (?, ?, ?, ?, FALSE)
            "#,
        )
        .bind(remitente)
        .bind(destinatario.idusuario)
        .bind(&mensaje)
        .bind(fecha)
        .execute(&mut *tx)
        .await?;

        creadas.push(Notificacion {
            idnotificacion: result.last_insert_id() as i64,
            idremitente: remitente,
            iddestinatario: destinatario.idusuario,
            mensaje: mensaje.clone(),
            fecha,
            leida: false,
        });
    }
    tx.commit().await?;
    Ok(creadas)
}

/// The caller's inbox, newest first
pub async fn list_for(pool: &MySqlPool, iddestinatario: i64) -> ServiceResult<Vec<Notificacion>> {
    let rows = sqlx::query_as::<_, Notificacion>(
        r#"
        SELECT idnotificacion, idremitente, iddestinatario, mensaje, fecha, leida
        FROM notificaciones
        WHERE iddestinatario = ?
        ORDER BY fecha DESC, idnotificacion DESC
        "#,
    )
    .bind(iddestinatario)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_for(
    pool: &MySqlPool,
    idnotificacion: i64,
    iddestinatario: i64,
) -> ServiceResult<Option<Notificacion>> {
    let row = sqlx::query_as::<_, Notificacion>(
        r#"
        SELECT idnotificacion, idremitente, iddestinatario, mensaje, fecha, leida
        FROM notificaciones
        WHERE idnotificacion = ? AND iddestinatario = ?
        "#,
    )
    .bind(idnotificacion)
    .bind(iddestinatario)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn mark_read(
    pool: &MySqlPool,
    idnotificacion: i64,
    iddestinatario: i64,
) -> ServiceResult<Notificacion> {
    sqlx::query(
        "UPDATE notificaciones SET leida = TRUE WHERE idnotificacion = ? AND iddestinatario = ?",
    )
    .bind(idnotificacion)
    .bind(iddestinatario)
    .execute(pool)
    .await?;

    find_for(pool, idnotificacion, iddestinatario)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::NotificacionNotFound).into())
}

pub async fn delete(pool: &MySqlPool, idnotificacion: i64, iddestinatario: i64) -> ServiceResult<()> {
    let rows = sqlx::query(
        "DELETE FROM notificaciones WHERE idnotificacion = ? AND iddestinatario = ?",
    )
    .bind(idnotificacion)
    .bind(iddestinatario)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::NotificacionNotFound).into());
    }
    Ok(())
}

fn validar_mensaje(mensaje: &str) -> Result<String, AppError> {
    let mensaje = mensaje.trim();
    if mensaje.is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField).with_detail("field", "mensaje"));
    }
    if mensaje.chars().count() > MAX_MENSAJE {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Message exceeds {MAX_MENSAJE} characters"),
        ));
    }
    Ok(mensaje.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_trimmed_and_bounded() {
        assert_eq!(validar_mensaje("  borrar pago 12 ").unwrap(), "borrar pago 12");
        assert_eq!(
            validar_mensaje("   ").unwrap_err().code,
            ErrorCode::RequiredField
        );
        let largo = "x".repeat(MAX_MENSAJE + 1);
        assert_eq!(
            validar_mensaje(&largo).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }
}
