//! Patients (dependents of a client)

use shared::error::{AppError, ErrorCode};
use shared::models::{Paciente, PacienteCreate, PacienteUpdate};
use sqlx::MySqlPool;

use crate::error::{ServiceError, ServiceResult};

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Paciente>> {
    let rows = sqlx::query_as::<_, Paciente>(
        "SELECT idpaciente, idcliente, nombre, edad, parentesco FROM pacientes ORDER BY nombre",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_cliente(pool: &MySqlPool, idcliente: i64) -> ServiceResult<Vec<Paciente>> {
    let rows = sqlx::query_as::<_, Paciente>(
        r#"
        SELECT idpaciente, idcliente, nombre, edad, parentesco
        FROM pacientes
        WHERE idcliente = ?
        ORDER BY nombre
        "#,
    )
    .bind(idcliente)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idpaciente: i64) -> ServiceResult<Option<Paciente>> {
    let row = sqlx::query_as::<_, Paciente>(
        "SELECT idpaciente, idcliente, nombre, edad, parentesco FROM pacientes WHERE idpaciente = ?",
    )
    .bind(idpaciente)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

fn validar_edad(edad: Option<i32>) -> Result<(), AppError> {
    if let Some(edad) = edad
        && !(0..=130).contains(&edad)
    {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            format!("Age out of range: {edad}"),
        ));
    }
    Ok(())
}

pub async fn create(pool: &MySqlPool, data: &PacienteCreate) -> ServiceResult<Paciente> {
    if data.nombre.trim().is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("field", "nombre")
            .into());
    }
    validar_edad(data.edad)?;

    let result = sqlx::query(
        "INSERT INTO pacientes (idcliente, nombre, edad, parentesco) VALUES (?, ?, ?, ?)",
    )
    .bind(data.idcliente)
    .bind(data.nombre.trim())
    .bind(data.edad)
    .bind(&data.parentesco)
    .execute(pool)
    .await
    .map_err(|e| ServiceError::foreign_key_or_db(e, ErrorCode::ClienteNotFound))?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::PacienteNotFound).into())
}

pub async fn update(pool: &MySqlPool, idpaciente: i64, data: &PacienteUpdate) -> ServiceResult<Paciente> {
    validar_edad(data.edad)?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE pacientes SET
            nombre = COALESCE(?, nombre),
            edad = COALESCE(?, edad),
            parentesco = COALESCE(?, parentesco)
        WHERE idpaciente = ?
        "#,
    )
    .bind(&data.nombre)
    .bind(data.edad)
    .bind(&data.parentesco)
    .bind(idpaciente)
    .execute(&mut *tx)
    .await?;

    let paciente = sqlx::query_as::<_, Paciente>(
        "SELECT idpaciente, idcliente, nombre, edad, parentesco FROM pacientes WHERE idpaciente = ?",
    )
    .bind(idpaciente)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::PacienteNotFound))?;

    tx.commit().await?;
    Ok(paciente)
}

pub async fn delete(pool: &MySqlPool, idpaciente: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM pacientes WHERE idpaciente = ?")
        .bind(idpaciente)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::PacienteNotFound).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn age_bounds() {
        assert!(validar_edad(None).is_ok());
        assert!(validar_edad(Some(0)).is_ok());
        assert!(validar_edad(Some(130)).is_ok());
        assert_eq!(
            validar_edad(Some(-1)).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
        assert!(validar_edad(Some(131)).is_err());
    }
}
