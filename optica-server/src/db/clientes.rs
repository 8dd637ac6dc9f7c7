//! Clients

use shared::error::{AppError, ErrorCode};
use shared::models::{Cliente, ClienteCreate, ClienteUpdate};
use shared::util::non_blank;
use sqlx::MySqlPool;

use crate::error::{ServiceError, ServiceResult};

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Cliente>> {
    let rows = sqlx::query_as::<_, Cliente>(
        r#"
        SELECT idcliente, nombre, apellido_paterno, apellido_materno, telefono,
               domicilio, localidad, creado_en
        FROM clientes
        ORDER BY apellido_paterno, nombre
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idcliente: i64) -> ServiceResult<Option<Cliente>> {
    let row = sqlx::query_as::<_, Cliente>(
        r#"
        SELECT idcliente, nombre, apellido_paterno, apellido_materno, telefono,
               domicilio, localidad, creado_en
        FROM clientes
        WHERE idcliente = ?
        "#,
    )
    .bind(idcliente)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &MySqlPool, data: &ClienteCreate) -> ServiceResult<Cliente> {
    if data.nombre.trim().is_empty() || data.apellido_paterno.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("fields", "nombre, apellido_paterno")
            .into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO clientes (
            nombre, apellido_paterno, apellido_materno, telefono,
            domicilio, localidad, creado_en
        )
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(data.nombre.trim())
    .bind(data.apellido_paterno.trim())
    .bind(non_blank(data.apellido_materno.clone()))
    .bind(non_blank(data.telefono.clone()))
    .bind(non_blank(data.domicilio.clone()))
    .bind(non_blank(data.localidad.clone()))
    .bind(shared::util::now())
    .execute(pool)
    .await?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ClienteNotFound).into())
}

pub async fn update(pool: &MySqlPool, idcliente: i64, data: &ClienteUpdate) -> ServiceResult<Cliente> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE clientes SET
            nombre = COALESCE(?, nombre),
            apellido_paterno = COALESCE(?, apellido_paterno),
            apellido_materno = COALESCE(?, apellido_materno),
            telefono = COALESCE(?, telefono),
            domicilio = COALESCE(?, domicilio),
            localidad = COALESCE(?, localidad)
        WHERE idcliente = ?
        "#,
    )
    .bind(&data.nombre)
    .bind(&data.apellido_paterno)
    .bind(&data.apellido_materno)
    .bind(&data.telefono)
    .bind(&data.domicilio)
    .bind(&data.localidad)
    .bind(idcliente)
    .execute(&mut *tx)
    .await?;

    let cliente = sqlx::query_as::<_, Cliente>(
        r#"
        SELECT idcliente, nombre, apellido_paterno, apellido_materno, telefono,
               domicilio, localidad, creado_en
        FROM clientes
        WHERE idcliente = ?
        "#,
    )
    .bind(idcliente)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::ClienteNotFound))?;

    tx.commit().await?;
    Ok(cliente)
}

/// Deletes the client and its patients; refused while sales reference it
pub async fn delete(pool: &MySqlPool, idcliente: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM clientes WHERE idcliente = ?")
        .bind(idcliente)
        .execute(pool)
        .await
        .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::ClienteHasVentas))?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::ClienteNotFound).into());
    }
    Ok(())
}
