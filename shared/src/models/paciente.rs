//! Patient Model (dependent of a client)

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Paciente {
    pub idpaciente: i64,
    pub idcliente: i64,
    pub nombre: String,
    pub edad: Option<i32>,
    /// Relationship to the client ("Hijo", "Esposa", ...)
    pub parentesco: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacienteCreate {
    pub idcliente: i64,
    pub nombre: String,
    pub edad: Option<i32>,
    pub parentesco: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PacienteUpdate {
    pub nombre: Option<String>,
    pub edad: Option<i32>,
    pub parentesco: Option<String>,
}
