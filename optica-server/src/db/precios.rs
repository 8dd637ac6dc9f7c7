//! Price catalog

use rust_decimal::Decimal;
use shared::error::{AppError, ErrorCode};
use shared::models::{Precio, PrecioCreate, PrecioUpdate};
use sqlx::MySqlPool;

use crate::error::ServiceResult;

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Precio>> {
    let rows = sqlx::query_as::<_, Precio>(
        r#"
        SELECT idprecio, concepto, categoria, precio, activo
        FROM precios
        ORDER BY categoria, concepto
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idprecio: i64) -> ServiceResult<Option<Precio>> {
    let row = sqlx::query_as::<_, Precio>(
        "SELECT idprecio, concepto, categoria, precio, activo FROM precios WHERE idprecio = ?",
    )
    .bind(idprecio)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

fn validar_precio(precio: Decimal) -> Result<(), AppError> {
    if precio < Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "Price must not be negative",
        ));
    }
    Ok(())
}

pub async fn create(pool: &MySqlPool, data: &PrecioCreate) -> ServiceResult<Precio> {
    if data.concepto.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("field", "concepto")
            .into());
    }
    validar_precio(data.precio)?;

    let result = sqlx::query(
        "INSERT INTO precios (concepto, categoria, precio, activo) VALUES (?, ?, ?, TRUE)",
    )
    .bind(data.concepto.trim())
    .bind(&data.categoria)
    .bind(data.precio.round_dp(2))
    .execute(pool)
    .await?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PrecioNotFound).into())
}

pub async fn update(pool: &MySqlPool, idprecio: i64, data: &PrecioUpdate) -> ServiceResult<Precio> {
    if let Some(precio) = data.precio {
        validar_precio(precio)?;
    }

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE precios SET
            concepto = COALESCE(?, concepto),
            categoria = COALESCE(?, categoria),
            precio = COALESCE(?, precio),
            activo = COALESCE(?, activo)
        WHERE idprecio = ?
        "#,
    )
    .bind(&data.concepto)
    .bind(&data.categoria)
    .bind(data.precio.map(|p| p.round_dp(2)))
    .bind(data.activo)
    .bind(idprecio)
    .execute(&mut *tx)
    .await?;

    let precio = sqlx::query_as::<_, Precio>(
        "SELECT idprecio, concepto, categoria, precio, activo FROM precios WHERE idprecio = ?",
    )
    .bind(idprecio)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::PrecioNotFound))?;

    tx.commit().await?;
    Ok(precio)
}

pub async fn delete(pool: &MySqlPool, idprecio: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM precios WHERE idprecio = ?")
        .bind(idprecio)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::PrecioNotFound).into());
    }
    Ok(())
}
