//! Sales
//!
//! `pagado` and `estado` are only written through [`guardar_balance`], always
//! with the sale row locked by [`lock`].

use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, ErrorCode};
use shared::models::{EstadoVenta, Venta, VentaCreate, VentaFiltro, VentaUpdate};
use sqlx::{MySqlConnection, MySqlPool};

use crate::error::{ServiceError, ServiceResult};
use crate::services::ledger::Balance;

pub async fn list(pool: &MySqlPool, filtro: &VentaFiltro) -> ServiceResult<Vec<Venta>> {
    let estado = filtro.estado.map(|e| e.as_str());
    let rows = sqlx::query_as::<_, Venta>(
        r#"
        SELECT folio, idcliente, idasesor, fecha, total, pagado, estado, numero_pagos, observaciones
        FROM ventas
        WHERE (? IS NULL OR estado = ?)
          AND (? IS NULL OR idcliente = ?)
        ORDER BY fecha DESC, folio
        "#,
    )
    .bind(estado)
    .bind(estado)
    .bind(filtro.idcliente)
    .bind(filtro.idcliente)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_folio(pool: &MySqlPool, folio: &str) -> ServiceResult<Option<Venta>> {
    let row = sqlx::query_as::<_, Venta>(
        r#"
        SELECT folio, idcliente, idasesor, fecha, total, pagado, estado, numero_pagos, observaciones
        FROM ventas
        WHERE folio = ?
        "#,
    )
    .bind(folio)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Load and lock a sale for the rest of the transaction
pub(crate) async fn lock(conn: &mut MySqlConnection, folio: &str) -> ServiceResult<Venta> {
    sqlx::query_as::<_, Venta>(
        r#"
        SELECT folio, idcliente, idasesor, fecha, total, pagado, estado, numero_pagos, observaciones
        FROM ventas
        WHERE folio = ?
        FOR UPDATE
        "#,
    )
    .bind(folio)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| venta_not_found(folio))
}

/// Persist a recomputed balance on a locked sale
pub(crate) async fn guardar_balance(
    conn: &mut MySqlConnection,
    folio: &str,
    balance: &Balance,
) -> ServiceResult<()> {
    sqlx::query("UPDATE ventas SET total = ?, pagado = ?, estado = ? WHERE folio = ?")
        .bind(balance.total)
        .bind(balance.pagado)
        .bind(balance.estado().as_str())
        .bind(folio)
        .execute(conn)
        .await?;
    Ok(())
}

fn validar_total(total: Decimal) -> Result<Decimal, AppError> {
    if total < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "Total must not be negative",
        ));
    }
    Ok(total.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

/// Create a sale; `idasesor` falls back to `asesor_por_defecto`
pub async fn create(
    pool: &MySqlPool,
    data: &VentaCreate,
    asesor_por_defecto: Option<i64>,
) -> ServiceResult<Venta> {
    let folio = data.folio.trim();
    if folio.is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("field", "folio")
            .into());
    }
    let total = validar_total(data.total)?;
    if data.numero_pagos < 0 {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "numero_pagos must not be negative",
        )
        .into());
    }

    let estado = Balance::new(total, Decimal::ZERO).estado();
    sqlx::query(
        r#"
        INSERT INTO ventas (folio, idcliente, idasesor, fecha, total, pagado, estado, numero_pagos, observaciones)
        VALUES (?, ?, ?, ?, ?, 0, ?, ?, ?)
        "#,
    )
    .bind(folio)
    .bind(data.idcliente)
    .bind(data.idasesor.or(asesor_por_defecto))
    .bind(data.fecha.unwrap_or_else(shared::util::today))
    .bind(total)
    .bind(estado.as_str())
    .bind(data.numero_pagos)
    .bind(&data.observaciones)
    .execute(pool)
    .await
    .map_err(|e| ServiceError::constraint(e, ErrorCode::FolioExists, ErrorCode::ClienteNotFound))?;

    find_by_folio(pool, folio)
        .await?
        .ok_or_else(|| venta_not_found(folio))
}

/// Update a sale
///
/// A new total goes through the balance guard; `estado = Cancelado` cancels,
/// any other value reactivates and lets the balance decide.
pub async fn update(pool: &MySqlPool, folio: &str, data: &VentaUpdate) -> ServiceResult<Venta> {
    let mut tx = pool.begin().await?;
    let venta = lock(&mut tx, folio).await?;

    let mut balance = Balance::of(&venta);
    if let Some(total) = data.total {
        balance = balance.con_total(validar_total(total)?)?;
    }
    if let Some(estado) = data.estado {
        balance.cancelada = estado == EstadoVenta::Cancelado;
    }
    if let Some(n) = data.numero_pagos
        && n < 0
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "numero_pagos must not be negative",
        )
        .into());
    }

    sqlx::query(
        r#"
        UPDATE ventas SET
            idcliente = COALESCE(?, idcliente),
            idasesor = COALESCE(?, idasesor),
            fecha = COALESCE(?, fecha),
            numero_pagos = COALESCE(?, numero_pagos),
            observaciones = COALESCE(?, observaciones)
        WHERE folio = ?
        "#,
    )
    .bind(data.idcliente)
    .bind(data.idasesor)
    .bind(data.fecha)
    .bind(data.numero_pagos)
    .bind(&data.observaciones)
    .bind(folio)
    .execute(&mut *tx)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::ClienteNotFound))?;

    guardar_balance(&mut tx, folio, &balance).await?;
    let venta = lock(&mut tx, folio).await?;
    tx.commit().await?;
    Ok(venta)
}

/// Delete a sale with no payments; its lenses go with it
pub async fn delete(pool: &MySqlPool, folio: &str) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    lock(&mut tx, folio).await?;

    let pagos: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pagos WHERE folio = ?")
        .bind(folio)
        .fetch_one(&mut *tx)
        .await?;
    if pagos > 0 {
        return Err(AppError::new(ErrorCode::VentaHasPagos)
            .with_detail("pagos", pagos)
            .into());
    }

    sqlx::query("DELETE FROM ventas WHERE folio = ?")
        .bind(folio)
        .execute(&mut *tx)
        .await
        .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::VentaHasPagos))?;
    tx.commit().await?;
    Ok(())
}

pub(crate) fn venta_not_found(folio: &str) -> ServiceError {
    AppError::new(ErrorCode::VentaNotFound)
        .with_detail("folio", folio)
        .into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_rounded_and_non_negative() {
        assert_eq!(
            validar_total(Decimal::new(100_499, 3)).unwrap(),
            Decimal::new(10_050, 2)
        );
        assert_eq!(validar_total(Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert_eq!(
            validar_total(Decimal::NEGATIVE_ONE).unwrap_err().code,
            ErrorCode::InvalidAmount
        );
    }

    #[test]
    fn total_rounds_like_payments() {
        let medio = Decimal::new(100_125, 3);
        assert_eq!(validar_total(medio).unwrap(), Decimal::new(10_013, 2));
        assert_eq!(
            validar_total(medio).unwrap(),
            crate::services::ledger::validar_monto(medio).unwrap()
        );
    }

    #[test]
    fn not_found_carries_folio() {
        let err: AppError = venta_not_found("A-17").into();
        assert_eq!(err.code, ErrorCode::VentaNotFound);
        assert_eq!(err.details.unwrap()["folio"], "A-17");
    }
}
