//! Price catalog Model

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Precio {
    pub idprecio: i64,
    pub concepto: String,
    pub categoria: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,
    pub activo: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrecioCreate {
    pub concepto: String,
    pub categoria: Option<String>,
    #[serde(with = "rust_decimal::serde::float")]
    pub precio: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PrecioUpdate {
    pub concepto: Option<String>,
    pub categoria: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub precio: Option<Decimal>,
    pub activo: Option<bool>,
}
