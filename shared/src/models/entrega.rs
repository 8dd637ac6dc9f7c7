//! Delivery / collection Model

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::MetodoPago;

db_enum! {
    /// `Lente` hands over a lens order; `Tarjeta` is a collection visit
    TipoEntrega {
        Lente => "Lente",
        Tarjeta => "Tarjeta",
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Entrega {
    pub identrega: i64,
    pub idruta: i64,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub tipo: TipoEntrega,
    pub folio: String,
    pub idlente: Option<i64>,
    /// Payment collected during a `Tarjeta` visit
    pub idpago: Option<i64>,
    pub fecha: NaiveDateTime,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntregaCreate {
    pub idruta: i64,
    pub tipo: TipoEntrega,
    pub folio: String,
    /// Required for `Lente`
    pub idlente: Option<i64>,
    /// Amount collected on a `Tarjeta` visit
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub monto: Option<Decimal>,
    pub metodo: Option<MetodoPago>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntregaUpdate {
    pub observaciones: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_visit_carries_amount() {
        let body: EntregaCreate = serde_json::from_str(
            r#"{"idruta":1,"tipo":"Tarjeta","folio":"A-9","monto":150.5}"#,
        )
        .unwrap();
        assert_eq!(body.tipo, TipoEntrega::Tarjeta);
        assert_eq!(body.monto, Some(Decimal::new(1505, 1)));
        assert!(body.idlente.is_none());
    }
}
