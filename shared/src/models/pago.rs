//! Payment Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

db_enum! {
    MetodoPago {
        Efectivo => "Efectivo",
        Transferencia => "Transferencia",
        Tarjeta => "Tarjeta",
    }
}

db_enum! {
    /// Only `Aplicado` payments count towards a sale's `pagado`
    EstadoPago {
        Aplicado => "Aplicado",
        Cancelado => "Cancelado",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Pago {
    pub idpago: i64,
    pub folio: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub fecha: NaiveDate,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub metodo: MetodoPago,
    /// Employee who collected the payment
    pub idcobrador: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub estado: EstadoPago,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagoCreate {
    pub folio: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub monto: Decimal,
    pub fecha: Option<NaiveDate>,
    #[serde(default = "default_metodo")]
    pub metodo: MetodoPago,
    pub idcobrador: Option<i64>,
}

fn default_metodo() -> MetodoPago {
    MetodoPago::Efectivo
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PagoUpdate {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monto: Option<Decimal>,
    pub fecha: Option<NaiveDate>,
    pub metodo: Option<MetodoPago>,
    pub idcobrador: Option<i64>,
    pub estado: Option<EstadoPago>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_defaults_to_cash() {
        let body: PagoCreate = serde_json::from_str(r#"{"folio":"A-1","monto":600}"#).unwrap();
        assert_eq!(body.metodo, MetodoPago::Efectivo);
        assert_eq!(body.monto, Decimal::from(600));
    }

    #[test]
    fn update_accepts_status_only() {
        let body: PagoUpdate = serde_json::from_str(r#"{"estado":"Cancelado"}"#).unwrap();
        assert_eq!(body.estado, Some(EstadoPago::Cancelado));
        assert!(body.monto.is_none());
    }
}
