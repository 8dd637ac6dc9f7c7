//! Delivery routes
//!
//! Counter changes go through a locked row and the checks in
//! `services::route_close`.

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{
    EstadoPago, EstadoRuta, NoEntregadosInput, Ruta, RutaCreate, RutaResumen, RutaUpdate,
    TipoEntrega,
};
use sqlx::{MySqlConnection, MySqlPool};

use crate::error::{ServiceError, ServiceResult};
use crate::services::route_close;

const COLUMNS: &str = "idruta, idasesor, fecha, hora_inicio, hora_fin, \
    lentes_recibidos, lentes_entregados, lentes_no_entregados, \
    tarjetas_recibidas, tarjetas_entregadas, tarjetas_no_entregadas, estado";

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Ruta>> {
    let sql = format!("SELECT {COLUMNS} FROM rutas ORDER BY hora_inicio DESC");
    let rows = sqlx::query_as::<_, Ruta>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idruta: i64) -> ServiceResult<Option<Ruta>> {
    let sql = format!("SELECT {COLUMNS} FROM rutas WHERE idruta = ?");
    let row = sqlx::query_as::<_, Ruta>(&sql)
        .bind(idruta)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// The advisor's route in progress, if any
pub async fn find_activa(pool: &MySqlPool, idasesor: i64) -> ServiceResult<Option<Ruta>> {
    let sql = format!("SELECT {COLUMNS} FROM rutas WHERE idasesor = ? AND estado = ? LIMIT 1");
    let row = sqlx::query_as::<_, Ruta>(&sql)
        .bind(idasesor)
        .bind(EstadoRuta::Activa.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Load and lock a route for the rest of the transaction
pub(crate) async fn lock(conn: &mut MySqlConnection, idruta: i64) -> ServiceResult<Ruta> {
    let sql = format!("SELECT {COLUMNS} FROM rutas WHERE idruta = ? FOR UPDATE");
    sqlx::query_as::<_, Ruta>(&sql)
        .bind(idruta)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| ruta_not_found(idruta))
}

fn validar_no_negativos(lentes: i32, tarjetas: i32) -> Result<(), AppError> {
    if lentes < 0 || tarjetas < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Received counts must not be negative",
        ));
    }
    Ok(())
}

/// One active route per advisor; locks the advisor's active rows
async fn exigir_sin_activa(conn: &mut MySqlConnection, idasesor: i64) -> ServiceResult<()> {
    let activa: Option<i64> = sqlx::query_scalar(
        "SELECT idruta FROM rutas WHERE idasesor = ? AND estado = ? LIMIT 1 FOR UPDATE",
    )
    .bind(idasesor)
    .bind(EstadoRuta::Activa.as_str())
    .fetch_optional(conn)
    .await?;
    if let Some(idruta) = activa {
        return Err(AppError::new(ErrorCode::RutaAlreadyActive)
            .with_detail("idruta", idruta)
            .with_detail("idasesor", idasesor)
            .into());
    }
    Ok(())
}

/// Start a route for `idasesor`
pub async fn create(pool: &MySqlPool, idasesor: i64, data: &RutaCreate) -> ServiceResult<Ruta> {
    validar_no_negativos(data.lentes_recibidos, data.tarjetas_recibidas)?;

    let mut tx = pool.begin().await?;
    exigir_sin_activa(&mut tx, idasesor).await?;

    let ahora = shared::util::now();
    let result = sqlx::query(
        r#"
        INSERT INTO rutas (
            idasesor, fecha, hora_inicio,
            lentes_recibidos, lentes_entregados, lentes_no_entregados,
            tarjetas_recibidas, tarjetas_entregadas, tarjetas_no_entregadas, estado
        )
        VALUES (?, ?, ?, ?, 0, 0, ?, 0, 0, ?)
        "#,
    )
    .bind(idasesor)
    .bind(ahora.date())
    .bind(ahora)
    .bind(data.lentes_recibidos)
    .bind(data.tarjetas_recibidas)
    .bind(EstadoRuta::Activa.as_str())
    .execute(&mut *tx)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::EmpleadoNotFound))?;

    let ruta = lock(&mut tx, result.last_insert_id() as i64).await?;
    tx.commit().await?;
    tracing::info!(idruta = ruta.idruta, idasesor, "Route started");
    Ok(ruta)
}

/// Admin correction of a route's header and received counts
pub async fn update(pool: &MySqlPool, idruta: i64, data: &RutaUpdate) -> ServiceResult<Ruta> {
    let mut tx = pool.begin().await?;
    let ruta = lock(&mut tx, idruta).await?;

    let lentes = data.lentes_recibidos.unwrap_or(ruta.lentes_recibidos);
    let tarjetas = data.tarjetas_recibidas.unwrap_or(ruta.tarjetas_recibidas);
    validar_no_negativos(lentes, tarjetas)?;
    route_close::validar_recibidos(&ruta, lentes, tarjetas)?;
    if let Some(idasesor) = route_close::nuevo_asesor(&ruta, data.idasesor) {
        exigir_sin_activa(&mut tx, idasesor).await?;
    }

    sqlx::query(
        r#"
        UPDATE rutas SET
            idasesor = COALESCE(?, idasesor),
            fecha = COALESCE(?, fecha),
            lentes_recibidos = ?,
            tarjetas_recibidas = ?
        WHERE idruta = ?
        "#,
    )
    .bind(data.idasesor)
    .bind(data.fecha)
    .bind(lentes)
    .bind(tarjetas)
    .bind(idruta)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::EmpleadoNotFound))?;

    let ruta = lock(&mut tx, idruta).await?;
    tx.commit().await?;
    Ok(ruta)
}

/// Record the undelivered counts, replacing any earlier submission
pub async fn registrar_no_entregados(
    pool: &MySqlPool,
    idruta: i64,
    input: &NoEntregadosInput,
) -> ServiceResult<Ruta> {
    let mut tx = pool.begin().await?;
    let ruta = lock(&mut tx, idruta).await?;
    route_close::validar_no_entregados(&ruta, input)?;

    sqlx::query(
        "UPDATE rutas SET lentes_no_entregados = ?, tarjetas_no_entregadas = ? WHERE idruta = ?",
    )
    .bind(input.lentes_no_entregados)
    .bind(input.tarjetas_no_entregadas)
    .bind(idruta)
    .execute(&mut *tx)
    .await?;

    let ruta = lock(&mut tx, idruta).await?;
    tx.commit().await?;
    Ok(ruta)
}

/// Close a reconciled route
pub async fn finalizar(pool: &MySqlPool, idruta: i64) -> ServiceResult<Ruta> {
    let mut tx = pool.begin().await?;
    let ruta = lock(&mut tx, idruta).await?;
    route_close::validar_finalizar(&ruta)?;

    sqlx::query("UPDATE rutas SET hora_fin = ?, estado = ? WHERE idruta = ?")
        .bind(shared::util::now())
        .bind(EstadoRuta::Finalizada.as_str())
        .bind(idruta)
        .execute(&mut *tx)
        .await?;

    let ruta = lock(&mut tx, idruta).await?;
    tx.commit().await?;
    tracing::info!(idruta, idasesor = ruta.idasesor, "Route finalized");
    Ok(ruta)
}

/// Bump the delivered counter for `tipo` on a locked route
pub(crate) async fn sumar_entrega(
    conn: &mut MySqlConnection,
    idruta: i64,
    tipo: TipoEntrega,
) -> ServiceResult<()> {
    let sql = match tipo {
        TipoEntrega::Lente => "UPDATE rutas SET lentes_entregados = lentes_entregados + 1 WHERE idruta = ?",
        TipoEntrega::Tarjeta => {
            "UPDATE rutas SET tarjetas_entregadas = tarjetas_entregadas + 1 WHERE idruta = ?"
        }
    };
    sqlx::query(sql).bind(idruta).execute(conn).await?;
    Ok(())
}

/// Undo [`sumar_entrega`] (floored at zero)
pub(crate) async fn restar_entrega(
    conn: &mut MySqlConnection,
    idruta: i64,
    tipo: TipoEntrega,
) -> ServiceResult<()> {
    let sql = match tipo {
        TipoEntrega::Lente => {
            "UPDATE rutas SET lentes_entregados = GREATEST(lentes_entregados - 1, 0) WHERE idruta = ?"
        }
        TipoEntrega::Tarjeta => {
            "UPDATE rutas SET tarjetas_entregadas = GREATEST(tarjetas_entregadas - 1, 0) WHERE idruta = ?"
        }
    };
    sqlx::query(sql).bind(idruta).execute(conn).await?;
    Ok(())
}

/// Remaining counts, expenses and money collected on the route
pub async fn resumen(pool: &MySqlPool, idruta: i64) -> ServiceResult<RutaResumen> {
    let ruta = find_by_id(pool, idruta)
        .await?
        .ok_or_else(|| ruta_not_found(idruta))?;
    let (lentes_pendientes, tarjetas_pendientes) = route_close::pendientes(&ruta);

    let total_gastos: Decimal =
        sqlx::query_scalar("SELECT COALESCE(SUM(monto), 0) FROM gastos_ruta WHERE idruta = ?")
            .bind(idruta)
            .fetch_one(pool)
            .await?;

    let total_cobrado: Decimal = sqlx::query_scalar(
        r#"
        SELECT COALESCE(SUM(p.monto), 0)
        FROM entregas e
        JOIN pagos p ON p.idpago = e.idpago
        WHERE e.idruta = ? AND p.estado = ?
        "#,
    )
    .bind(idruta)
    .bind(EstadoPago::Aplicado.as_str())
    .fetch_one(pool)
    .await?;

    Ok(RutaResumen {
        idruta,
        estado: ruta.estado,
        lentes_pendientes,
        tarjetas_pendientes,
        total_gastos,
        total_cobrado,
    })
}

/// Delete a route with its expenses and deliveries
pub async fn delete(pool: &MySqlPool, idruta: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM rutas WHERE idruta = ?")
        .bind(idruta)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(ruta_not_found(idruta));
    }
    Ok(())
}

pub(crate) fn ruta_not_found(idruta: i64) -> ServiceError {
    AppError::new(ErrorCode::RutaNotFound)
        .with_detail("idruta", idruta)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_received_counts_rejected() {
        assert!(validar_no_negativos(0, 0).is_ok());
        assert_eq!(
            validar_no_negativos(-1, 3).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(validar_no_negativos(2, -5).is_err());
    }
}
