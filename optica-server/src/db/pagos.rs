//! Payments
//!
//! Every write locks the parent sale first, runs the ledger, then writes the
//! payment row and the sale balance in the same transaction.

use shared::error::{AppError, ErrorCode};
use shared::models::{EstadoPago, Pago, PagoCreate, PagoUpdate};
use sqlx::{MySqlConnection, MySqlPool};

use crate::db::ventas;
use crate::error::{ServiceError, ServiceResult};
use crate::services::ledger::{self, Balance, PagoEstado};

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Pago>> {
    let rows = sqlx::query_as::<_, Pago>(
        r#"
        SELECT idpago, folio, monto, fecha, metodo, idcobrador, estado
        FROM pagos
        ORDER BY fecha DESC, idpago DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_folio(pool: &MySqlPool, folio: &str) -> ServiceResult<Vec<Pago>> {
    let rows = sqlx::query_as::<_, Pago>(
        r#"
        SELECT idpago, folio, monto, fecha, metodo, idcobrador, estado
        FROM pagos
        WHERE folio = ?
        ORDER BY fecha, idpago
        "#,
    )
    .bind(folio)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idpago: i64) -> ServiceResult<Option<Pago>> {
    let row = sqlx::query_as::<_, Pago>(
        "SELECT idpago, folio, monto, fecha, metodo, idcobrador, estado FROM pagos WHERE idpago = ?",
    )
    .bind(idpago)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn fetch(conn: &mut MySqlConnection, idpago: i64, for_update: bool) -> ServiceResult<Pago> {
    let sql = if for_update {
        "SELECT idpago, folio, monto, fecha, metodo, idcobrador, estado FROM pagos WHERE idpago = ? FOR UPDATE"
    } else {
        "SELECT idpago, folio, monto, fecha, metodo, idcobrador, estado FROM pagos WHERE idpago = ?"
    };
    sqlx::query_as::<_, Pago>(sql)
        .bind(idpago)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PagoNotFound).into())
}

/// Apply a new payment inside an open transaction
///
/// Shared with deliveries, which record a collection and its payment together.
pub(crate) async fn aplicar(
    conn: &mut MySqlConnection,
    data: &PagoCreate,
    cobrador_por_defecto: Option<i64>,
) -> ServiceResult<Pago> {
    let monto = ledger::validar_monto(data.monto)?;
    let venta = ventas::lock(conn, &data.folio).await?;
    let balance = Balance::of(&venta).abonar(monto)?;

    let result = sqlx::query(
        r#"
        INSERT INTO pagos (folio, monto, fecha, metodo, idcobrador, estado)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&venta.folio)
    .bind(monto)
    .bind(data.fecha.unwrap_or_else(shared::util::today))
    .bind(data.metodo.as_str())
    .bind(data.idcobrador.or(cobrador_por_defecto))
    .bind(EstadoPago::Aplicado.as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::EmpleadoNotFound))?;

    ventas::guardar_balance(conn, &venta.folio, &balance).await?;
    tracing::debug!(
        folio = %venta.folio,
        monto = %monto,
        pagado = %balance.pagado,
        estado = %balance.estado(),
        "Payment applied"
    );

    fetch(conn, result.last_insert_id() as i64, false).await
}

pub async fn create(
    pool: &MySqlPool,
    data: &PagoCreate,
    cobrador_por_defecto: Option<i64>,
) -> ServiceResult<Pago> {
    let mut tx = pool.begin().await?;
    let pago = aplicar(&mut tx, data, cobrador_por_defecto).await?;
    tx.commit().await?;
    Ok(pago)
}

/// Update a payment; amount and status changes move the sale balance
pub async fn update(pool: &MySqlPool, idpago: i64, data: &PagoUpdate) -> ServiceResult<Pago> {
    let nuevo_monto = data.monto.map(ledger::validar_monto).transpose()?;

    let mut tx = pool.begin().await?;
    // Sale first, then payment: same lock order as `aplicar`
    let folio = fetch(&mut tx, idpago, false).await?.folio;
    let venta = ventas::lock(&mut tx, &folio).await?;
    let anterior = fetch(&mut tx, idpago, true).await?;

    let antes = PagoEstado {
        monto: anterior.monto,
        estado: anterior.estado,
    };
    let despues = PagoEstado {
        monto: nuevo_monto.unwrap_or(anterior.monto),
        estado: data.estado.unwrap_or(anterior.estado),
    };
    let balance = ledger::transicion(Balance::of(&venta), antes, despues)?;

    sqlx::query(
        r#"
        UPDATE pagos SET
            monto = ?,
            fecha = COALESCE(?, fecha),
            metodo = COALESCE(?, metodo),
            idcobrador = COALESCE(?, idcobrador),
            estado = ?
        WHERE idpago = ?
        "#,
    )
    .bind(despues.monto)
    .bind(data.fecha)
    .bind(data.metodo.map(|m| m.as_str()))
    .bind(data.idcobrador)
    .bind(despues.estado.as_str())
    .bind(idpago)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::EmpleadoNotFound))?;

    ventas::guardar_balance(&mut tx, &folio, &balance).await?;
    let pago = fetch(&mut tx, idpago, false).await?;
    tx.commit().await?;
    Ok(pago)
}

/// Delete a payment; an applied one is taken off the sale balance
pub async fn delete(pool: &MySqlPool, idpago: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let folio = fetch(&mut tx, idpago, false).await?.folio;
    let venta = ventas::lock(&mut tx, &folio).await?;
    let pago = fetch(&mut tx, idpago, true).await?;

    if pago.estado == EstadoPago::Aplicado {
        let balance = Balance::of(&venta).revertir(pago.monto);
        ventas::guardar_balance(&mut tx, &folio, &balance).await?;
    }

    sqlx::query("DELETE FROM pagos WHERE idpago = ?")
        .bind(idpago)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
