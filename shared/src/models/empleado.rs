//! Employee Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Employee record (person + employment fields)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Empleado {
    pub idempleado: i64,
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub puesto: String,
    pub fecha_ingreso: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub sueldo: Decimal,
    pub activo: bool,
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmpleadoCreate {
    pub nombre: String,
    pub apellido_paterno: String,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub puesto: String,
    /// Defaults to today
    pub fecha_ingreso: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub sueldo: Decimal,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmpleadoUpdate {
    pub nombre: Option<String>,
    pub apellido_paterno: Option<String>,
    pub apellido_materno: Option<String>,
    pub telefono: Option<String>,
    pub puesto: Option<String>,
    pub fecha_ingreso: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub sueldo: Option<Decimal>,
    pub activo: Option<bool>,
}
