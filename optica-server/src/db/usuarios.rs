//! User accounts

use shared::error::{AppError, ErrorCode};
use shared::models::{Rol, Usuario, UsuarioCreate, UsuarioUpdate};
use sqlx::MySqlPool;

use crate::error::{ServiceError, ServiceResult};
use crate::util::{MIN_PASSWORD_LEN, hash_password};

/// Account row plus its password hash (login only)
#[derive(sqlx::FromRow)]
pub struct Credenciales {
    #[sqlx(flatten)]
    pub usuario: Usuario,
    pub password_hash: String,
}

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Usuario>> {
    let rows = sqlx::query_as::<_, Usuario>(
        "SELECT idusuario, correo, rol, idempleado, activo, creado_en FROM usuarios ORDER BY correo",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idusuario: i64) -> ServiceResult<Option<Usuario>> {
    let row = sqlx::query_as::<_, Usuario>(
        "SELECT idusuario, correo, rol, idempleado, activo, creado_en FROM usuarios WHERE idusuario = ?",
    )
    .bind(idusuario)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn find_credentials(pool: &MySqlPool, correo: &str) -> ServiceResult<Option<Credenciales>> {
    let row = sqlx::query_as::<_, Credenciales>(
        r#"
        SELECT idusuario, correo, rol, idempleado, activo, creado_en, password_hash
        FROM usuarios
        WHERE correo = ?
        "#,
    )
    .bind(correo)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

/// Active `Matriz` accounts (notification recipients)
pub async fn list_active_admins(pool: &MySqlPool) -> ServiceResult<Vec<Usuario>> {
    let rows = sqlx::query_as::<_, Usuario>(
        r#"
        SELECT idusuario, correo, rol, idempleado, activo, creado_en
        FROM usuarios
        WHERE rol = ? AND activo = TRUE
        "#,
    )
    .bind(Rol::Matriz.as_str())
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

fn normalize_email(correo: &str) -> Result<String, AppError> {
    let correo = correo.trim().to_lowercase();
    if correo.is_empty() || !correo.contains('@') {
        return Err(AppError::validation("A valid email is required").with_detail("field", "correo"));
    }
    Ok(correo)
}

fn hash_checked(password: &str) -> ServiceResult<String> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::new(ErrorCode::PasswordTooShort).into());
    }
    hash_password(password).map_err(|e| ServiceError::Db(format!("Failed to hash password: {e}").into()))
}

fn map_write_error(e: sqlx::Error) -> ServiceError {
    ServiceError::constraint(e, ErrorCode::EmailAlreadyExists, ErrorCode::EmpleadoNotFound)
}

pub async fn create(pool: &MySqlPool, data: &UsuarioCreate) -> ServiceResult<Usuario> {
    let correo = normalize_email(&data.correo)?;
    let password_hash = hash_checked(&data.password)?;

    let result = sqlx::query(
        r#"
        INSERT INTO usuarios (correo, password_hash, rol, idempleado, activo, creado_en)
        VALUES (?, ?, ?, ?, TRUE, ?)
        "#,
    )
    .bind(&correo)
    .bind(&password_hash)
    .bind(data.rol.as_str())
    .bind(data.idempleado)
    .bind(shared::util::now())
    .execute(pool)
    .await
    .map_err(map_write_error)?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UsuarioNotFound).into())
}

pub async fn update(pool: &MySqlPool, idusuario: i64, data: &UsuarioUpdate) -> ServiceResult<Usuario> {
    let correo = data.correo.as_deref().map(normalize_email).transpose()?;
    let password_hash = data.password.as_deref().map(hash_checked).transpose()?;

    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE usuarios SET
            correo = COALESCE(?, correo),
            password_hash = COALESCE(?, password_hash),
            rol = COALESCE(?, rol),
            idempleado = COALESCE(?, idempleado),
            activo = COALESCE(?, activo)
        WHERE idusuario = ?
        "#,
    )
    .bind(&correo)
    .bind(&password_hash)
    .bind(data.rol.map(|r| r.as_str()))
    .bind(data.idempleado)
    .bind(data.activo)
    .bind(idusuario)
    .execute(&mut *tx)
    .await
    .map_err(map_write_error)?;

    let usuario = sqlx::query_as::<_, Usuario>(
        "SELECT idusuario, correo, rol, idempleado, activo, creado_en FROM usuarios WHERE idusuario = ?",
    )
    .bind(idusuario)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::UsuarioNotFound))?;

    tx.commit().await?;
    Ok(usuario)
}

pub async fn delete(pool: &MySqlPool, idusuario: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM usuarios WHERE idusuario = ?")
        .bind(idusuario)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::UsuarioNotFound).into());
    }
    Ok(())
}

/// Create the first `Matriz` account when none exists
///
/// Returns `true` when an account was created.
pub async fn ensure_admin(pool: &MySqlPool, correo: &str, password: &str) -> ServiceResult<bool> {
    let (admins,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM usuarios WHERE rol = ?")
        .bind(Rol::Matriz.as_str())
        .fetch_one(pool)
        .await?;
    if admins > 0 {
        return Ok(false);
    }

    create(
        pool,
        &UsuarioCreate {
            correo: correo.to_string(),
            password: password.to_string(),
            rol: Rol::Matriz,
            idempleado: None,
        },
    )
    .await?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_is_normalized() {
        assert_eq!(normalize_email("  Ana@Optica.MX ").unwrap(), "ana@optica.mx");
        assert!(normalize_email("sin-arroba").is_err());
        assert!(normalize_email("   ").is_err());
    }

    #[test]
    fn short_password_is_rejected() {
        let err = hash_checked("1234567").unwrap_err();
        match err {
            ServiceError::App(e) => assert_eq!(e.code, ErrorCode::PasswordTooShort),
            ServiceError::Db(e) => panic!("unexpected db error: {e}"),
        }
        assert!(hash_checked("12345678").is_ok());
    }
}
