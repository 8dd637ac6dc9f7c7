//! Dashboard totals

use rust_decimal::Decimal;
use shared::models::{EstadoEntrega, EstadoRuta, EstadoVenta, ResumenGeneral};
use sqlx::MySqlPool;

use crate::error::ServiceResult;

pub async fn resumen(pool: &MySqlPool) -> ServiceResult<ResumenGeneral> {
    let clientes: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM clientes")
        .fetch_one(pool)
        .await?;

    let (ventas_pendientes, ventas_pagadas, ventas_canceladas): (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT
            CAST(COALESCE(SUM(estado = ?), 0) AS SIGNED),
            CAST(COALESCE(SUM(estado = ?), 0) AS SIGNED),
            CAST(COALESCE(SUM(estado = ?), 0) AS SIGNED)
        FROM ventas
        "#,
    )
    .bind(EstadoVenta::Pendiente.as_str())
    .bind(EstadoVenta::Pagado.as_str())
    .bind(EstadoVenta::Cancelado.as_str())
    .fetch_one(pool)
    .await?;

    // Cancelled sales are left out of the money totals
    let (total_vendido, total_cobrado): (Decimal, Decimal) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(total), 0), COALESCE(SUM(pagado), 0)
        FROM ventas
        WHERE estado <> ?
        "#,
    )
    .bind(EstadoVenta::Cancelado.as_str())
    .fetch_one(pool)
    .await?;

    let rutas_activas: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rutas WHERE estado = ?")
        .bind(EstadoRuta::Activa.as_str())
        .fetch_one(pool)
        .await?;

    let lentes_pendientes: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM lentes WHERE estado_entrega <> ?")
            .bind(EstadoEntrega::Entregado.as_str())
            .fetch_one(pool)
            .await?;

    let total_gastos_ruta: Decimal =
        sqlx::query_scalar("SELECT COALESCE(SUM(monto), 0) FROM gastos_ruta")
            .fetch_one(pool)
            .await?;

    Ok(ResumenGeneral {
        clientes,
        ventas_pendientes,
        ventas_pagadas,
        ventas_canceladas,
        total_vendido,
        total_cobrado,
        saldo_pendiente: total_vendido - total_cobrado,
        rutas_activas,
        lentes_pendientes,
        total_gastos_ruta,
    })
}
