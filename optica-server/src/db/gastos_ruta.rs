//! Route expenses

use shared::error::{AppError, ErrorCode};
use shared::models::{GastoRuta, GastoRutaCreate, GastoRutaUpdate};
use sqlx::MySqlPool;

use crate::db::rutas;
use crate::error::{ServiceError, ServiceResult};
use crate::services::ledger;

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<GastoRuta>> {
    let rows = sqlx::query_as::<_, GastoRuta>(
        "SELECT idgasto, idruta, concepto, monto, fecha FROM gastos_ruta ORDER BY fecha DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_ruta(pool: &MySqlPool, idruta: i64) -> ServiceResult<Vec<GastoRuta>> {
    let rows = sqlx::query_as::<_, GastoRuta>(
        r#"
        SELECT idgasto, idruta, concepto, monto, fecha
        FROM gastos_ruta
        WHERE idruta = ?
        ORDER BY fecha
        "#,
    )
    .bind(idruta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idgasto: i64) -> ServiceResult<Option<GastoRuta>> {
    let row = sqlx::query_as::<_, GastoRuta>(
        "SELECT idgasto, idruta, concepto, monto, fecha FROM gastos_ruta WHERE idgasto = ?",
    )
    .bind(idgasto)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &MySqlPool, data: &GastoRutaCreate) -> ServiceResult<GastoRuta> {
    if data.concepto.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("field", "concepto")
            .into());
    }
    let monto = ledger::validar_monto(data.monto)?;

    let result = sqlx::query(
        "INSERT INTO gastos_ruta (idruta, concepto, monto, fecha) VALUES (?, ?, ?, ?)",
    )
    .bind(data.idruta)
    .bind(data.concepto.trim())
    .bind(monto)
    .bind(shared::util::now())
    .execute(pool)
    .await
    .map_err(|e| match ServiceError::foreign_key_or_db(e, ErrorCode::RutaNotFound) {
        ServiceError::App(_) => rutas::ruta_not_found(data.idruta),
        other => other,
    })?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::GastoNotFound).into())
}

pub async fn update(pool: &MySqlPool, idgasto: i64, data: &GastoRutaUpdate) -> ServiceResult<GastoRuta> {
    let monto = data.monto.map(ledger::validar_monto).transpose()?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE gastos_ruta SET
            concepto = COALESCE(?, concepto),
            monto = COALESCE(?, monto)
        WHERE idgasto = ?
        "#,
    )
    .bind(&data.concepto)
    .bind(monto)
    .bind(idgasto)
    .execute(&mut *tx)
    .await?;

    let gasto = sqlx::query_as::<_, GastoRuta>(
        "SELECT idgasto, idruta, concepto, monto, fecha FROM gastos_ruta WHERE idgasto = ?",
    )
    .bind(idgasto)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::GastoNotFound))?;

    tx.commit().await?;
    Ok(gasto)
}

pub async fn delete(pool: &MySqlPool, idgasto: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM gastos_ruta WHERE idgasto = ?")
        .bind(idgasto)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::GastoNotFound).into());
    }
    Ok(())
}
