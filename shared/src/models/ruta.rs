//! Route Model
//!
//! One advisor's delivery day. Counters track lenses and collection cards
//! received at the start, delivered during the day and reported undelivered
//! at close-out.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

db_enum! {
    EstadoRuta {
        Activa => "Activa",
        Finalizada => "Finalizada",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Ruta {
    pub idruta: i64,
    pub idasesor: i64,
    pub fecha: NaiveDate,
    pub hora_inicio: NaiveDateTime,
    pub hora_fin: Option<NaiveDateTime>,
    pub lentes_recibidos: i32,
    pub lentes_entregados: i32,
    pub lentes_no_entregados: i32,
    pub tarjetas_recibidas: i32,
    pub tarjetas_entregadas: i32,
    pub tarjetas_no_entregadas: i32,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub estado: EstadoRuta,
}

/// Start route payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RutaCreate {
    /// Defaults to the caller's employee record
    pub idasesor: Option<i64>,
    #[serde(default)]
    pub lentes_recibidos: i32,
    #[serde(default)]
    pub tarjetas_recibidas: i32,
}

/// Admin correction payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RutaUpdate {
    pub idasesor: Option<i64>,
    pub fecha: Option<NaiveDate>,
    pub lentes_recibidos: Option<i32>,
    pub tarjetas_recibidas: Option<i32>,
}

/// Undelivered counts submitted before finalizing
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct NoEntregadosInput {
    #[serde(default)]
    pub lentes_no_entregados: i32,
    #[serde(default)]
    pub tarjetas_no_entregadas: i32,
}

/// Close-out summary for a route
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RutaResumen {
    pub idruta: i64,
    pub estado: EstadoRuta,
    pub lentes_pendientes: i32,
    pub tarjetas_pendientes: i32,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_gastos: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cobrado: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_payload_defaults_counts() {
        let body: RutaCreate = serde_json::from_str(r#"{"lentes_recibidos":5}"#).unwrap();
        assert_eq!(body.lentes_recibidos, 5);
        assert_eq!(body.tarjetas_recibidas, 0);
        assert!(body.idasesor.is_none());
    }

    #[test]
    fn no_entregados_accepts_partial_body() {
        let body: NoEntregadosInput =
            serde_json::from_str(r#"{"tarjetas_no_entregadas":2}"#).unwrap();
        assert_eq!(body.lentes_no_entregados, 0);
        assert_eq!(body.tarjetas_no_entregadas, 2);
    }
}
