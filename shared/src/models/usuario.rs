//! User account model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

db_enum! {
    /// Role carried in the session token
    ///
    /// `Matriz` is the head-office administrator; `Asesor` and
    /// `Optometrista` are field roles.
    Rol {
        Matriz => "Matriz",
        Asesor => "Asesor",
        Optometrista => "Optometrista",
    }
}

impl Rol {
    /// Whether the role passes admin-gated operations
    pub fn is_admin(&self) -> bool {
        matches!(self, Rol::Matriz)
    }
}

/// User account (without password hash)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Usuario {
    pub idusuario: i64,
    pub correo: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub rol: Rol,
    /// Linked employee record, if any
    pub idempleado: Option<i64>,
    pub activo: bool,
    pub creado_en: NaiveDateTime,
}

/// Create user payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsuarioCreate {
    pub correo: String,
    pub password: String,
    pub rol: Rol,
    pub idempleado: Option<i64>,
}

/// Update user payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UsuarioUpdate {
    pub correo: Option<String>,
    pub password: Option<String>,
    pub rol: Option<Rol>,
    pub idempleado: Option<i64>,
    pub activo: Option<bool>,
}

/// `POST /api/auth/login` body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub correo: String,
    pub password: String,
}

/// Login result; the token itself travels in the `token` cookie
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub usuario: Usuario,
    /// Session lifetime in seconds
    pub expires_in: i64,
}
