//! Client Model

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Client (contract holder)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Cliente {
    pub idcliente: i64,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub localidad: Option<String>,
    pub creado_en: NaiveDateTime,
}

/// Create client payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClienteCreate {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub localidad: Option<String>,
}

/// Update client payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClienteUpdate {
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub domicilio: Option<String>,
    pub localidad: Option<String>,
}
