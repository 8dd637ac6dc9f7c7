//! Route expense Model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct GastoRuta {
    pub idgasto: i64,
    pub idruta: i64,
    pub concepto: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub fecha: NaiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GastoRutaCreate {
    pub idruta: i64,
    pub concepto: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GastoRutaUpdate {
    pub concepto: Option<String>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monto: Option<Decimal>,
}
