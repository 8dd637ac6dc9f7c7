//! Employees

use shared::error::{AppError, ErrorCode};
use shared::models::{Empleado, EmpleadoCreate, EmpleadoUpdate};
use sqlx::MySqlPool;

use crate::error::{ServiceError, ServiceResult};

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Empleado>> {
    let rows = sqlx::query_as::<_, Empleado>(
        r#"
        SELECT idempleado, nombre, apellido_paterno, apellido_materno, telefono,
               puesto, fecha_ingreso, sueldo, activo
        FROM empleados
        ORDER BY apellido_paterno, nombre
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idempleado: i64) -> ServiceResult<Option<Empleado>> {
    let row = sqlx::query_as::<_, Empleado>(
        r#"
        SELECT idempleado, nombre, apellido_paterno, apellido_materno, telefono,
               puesto, fecha_ingreso, sueldo, activo
        FROM empleados
        WHERE idempleado = ?
        "#,
    )
    .bind(idempleado)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &MySqlPool, data: &EmpleadoCreate) -> ServiceResult<Empleado> {
    if data.nombre.trim().is_empty() || data.apellido_paterno.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("fields", "nombre, apellido_paterno")
            .into());
    }

    let result = sqlx::query(
        r#"
        INSERT INTO empleados (
            nombre, apellido_paterno, apellido_materno, telefono,
            puesto, fecha_ingreso, sueldo, activo
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(data.nombre.trim())
    .bind(data.apellido_paterno.trim())
    .bind(&data.apellido_materno)
    .bind(&data.telefono)
    .bind(&data.puesto)
    .bind(data.fecha_ingreso.unwrap_or_else(shared::util::today))
    .bind(data.sueldo)
    .execute(pool)
    .await?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::EmpleadoNotFound).into())
}

pub async fn update(pool: &MySqlPool, idempleado: i64, data: &EmpleadoUpdate) -> ServiceResult<Empleado> {
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE empleados SET
            nombre = COALESCE(?, nombre),
            apellido_paterno = COALESCE(?, apellido_paterno),
            apellido_materno = COALESCE(?, apellido_materno),
            telefono = COALESCE(?, telefono),
            puesto = COALESCE(?, puesto),
            fecha_ingreso = COALESCE(?, fecha_ingreso),
            sueldo = COALESCE(?, sueldo),
            activo = COALESCE(?, activo)
        WHERE idempleado = ?
        "#,
    )
    .bind(&data.nombre)
    .bind(&data.apellido_paterno)
    .bind(&data.apellido_materno)
    .bind(&data.telefono)
    .bind(&data.puesto)
    .bind(data.fecha_ingreso)
    .bind(data.sueldo)
    .bind(data.activo)
    .bind(idempleado)
    .execute(&mut *tx)
    .await?;

    let empleado = sqlx::query_as::<_, Empleado>(
        r#"
        SELECT idempleado, nombre, apellido_paterno, apellido_materno, telefono,
               puesto, fecha_ingreso, sueldo, activo
        FROM empleados
        WHERE idempleado = ?
        "#,
    )
    .bind(idempleado)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::EmpleadoNotFound))?;

    tx.commit().await?;
    Ok(empleado)
}

/// Hard delete; refused while users, sales or routes still reference the employee
pub async fn delete(pool: &MySqlPool, idempleado: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM empleados WHERE idempleado = ?")
        .bind(idempleado)
        .execute(pool)
        .await
        .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::EmpleadoInUse))?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::EmpleadoNotFound).into());
    }
    Ok(())
}
