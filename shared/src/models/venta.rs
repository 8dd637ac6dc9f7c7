//! Sale (contract) Model
//!
//! A sale is keyed by its folio. `pagado` is the running sum of applied
//! payments; only the ledger writes it.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

db_enum! {
    EstadoVenta {
        Pendiente => "Pendiente",
        Pagado => "Pagado",
        Cancelado => "Cancelado",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Venta {
    pub folio: String,
    pub idcliente: i64,
    pub idasesor: Option<i64>,
    pub fecha: NaiveDate,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub pagado: Decimal,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub estado: EstadoVenta,
    pub numero_pagos: i32,
    pub observaciones: Option<String>,
}

impl Venta {
    /// Outstanding balance (`total - pagado`)
    pub fn saldo(&self) -> Decimal {
        self.total - self.pagado
    }
}

/// Create sale payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VentaCreate {
    pub folio: String,
    pub idcliente: i64,
    /// Defaults to the caller's employee record
    pub idasesor: Option<i64>,
    /// Defaults to today
    pub fecha: Option<NaiveDate>,
    #[serde(with = "rust_decimal::serde::float")]
    pub total: Decimal,
    #[serde(default)]
    pub numero_pagos: i32,
    pub observaciones: Option<String>,
}

/// Update sale payload
///
/// `estado = Cancelado` cancels the sale; any other value reactivates it and
/// the status is recomputed from the balance.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VentaUpdate {
    pub idcliente: Option<i64>,
    pub idasesor: Option<i64>,
    pub fecha: Option<NaiveDate>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub total: Option<Decimal>,
    pub numero_pagos: Option<i32>,
    pub observaciones: Option<String>,
    pub estado: Option<EstadoVenta>,
}

/// `GET /api/ventas` query filters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VentaFiltro {
    pub estado: Option<EstadoVenta>,
    pub idcliente: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn money_is_a_json_number() {
        let venta = Venta {
            folio: "A-100".into(),
            idcliente: 1,
            idasesor: Some(2),
            fecha: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total: Decimal::from(1000),
            pagado: Decimal::from_str("250.50").unwrap(),
            estado: EstadoVenta::Pendiente,
            numero_pagos: 4,
            observaciones: None,
        };
        let json = serde_json::to_value(&venta).unwrap();
        assert_eq!(json["total"], serde_json::json!(1000.0));
        assert_eq!(json["pagado"], serde_json::json!(250.5));
        assert_eq!(json["estado"], "Pendiente");
        assert_eq!(venta.saldo(), Decimal::from_str("749.50").unwrap());
    }

    #[test]
    fn create_accepts_minimal_body() {
        let body: VentaCreate =
            serde_json::from_str(r#"{"folio":"B-7","idcliente":3,"total":1200}"#).unwrap();
        assert_eq!(body.total, Decimal::from(1200));
        assert_eq!(body.numero_pagos, 0);
        assert!(body.idasesor.is_none());
        assert!(body.fecha.is_none());
    }

    #[test]
    fn filter_parses_estado() {
        let filtro: VentaFiltro = serde_json::from_str(r#"{"estado":"Pagado"}"#).unwrap();
        assert_eq!(filtro.estado, Some(EstadoVenta::Pagado));
        assert!(filtro.idcliente.is_none());
    }
}
