//! Lens order Model

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

db_enum! {
    EstadoEntrega {
        Pendiente => "Pendiente",
        Entregado => "Entregado",
        NoEntregado => "NoEntregado",
    }
}

/// Lens-fitting order tied to a sale
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Lente {
    pub idlente: i64,
    pub folio: String,
    pub idoptometrista: Option<i64>,
    pub idpaciente: Option<i64>,
    #[serde(flatten)]
    #[cfg_attr(feature = "db", sqlx(flatten))]
    pub graduacion: Graduacion,
    pub material: Option<String>,
    pub tratamiento: Option<String>,
    pub armazon: Option<String>,
    pub fecha_examen: NaiveDate,
    pub fecha_entrega: Option<NaiveDate>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub estado_entrega: EstadoEntrega,
    pub observaciones: Option<String>,
}

/// Per-eye prescription (`od` right, `oi` left)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Graduacion {
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub od_esfera: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub od_cilindro: Option<Decimal>,
    pub od_eje: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub od_adicion: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub oi_esfera: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub oi_cilindro: Option<Decimal>,
    pub oi_eje: Option<i32>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub oi_adicion: Option<Decimal>,
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub distancia_pupilar: Option<Decimal>,
}

impl Graduacion {
    /// Axis values must lie in 0..=180
    pub fn ejes_validos(&self) -> bool {
        [self.od_eje, self.oi_eje]
            .into_iter()
            .flatten()
            .all(|eje| (0..=180).contains(&eje))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LenteCreate {
    pub folio: String,
    /// Defaults to the caller's employee record
    pub idoptometrista: Option<i64>,
    pub idpaciente: Option<i64>,
    #[serde(flatten)]
    pub graduacion: Graduacion,
    pub material: Option<String>,
    pub tratamiento: Option<String>,
    pub armazon: Option<String>,
    /// Defaults to today
    pub fecha_examen: Option<NaiveDate>,
    pub observaciones: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LenteUpdate {
    pub idoptometrista: Option<i64>,
    pub idpaciente: Option<i64>,
    #[serde(flatten)]
    pub graduacion: Graduacion,
    pub material: Option<String>,
    pub tratamiento: Option<String>,
    pub armazon: Option<String>,
    pub fecha_examen: Option<NaiveDate>,
    pub fecha_entrega: Option<NaiveDate>,
    pub estado_entrega: Option<EstadoEntrega>,
    pub observaciones: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn create_flattens_prescription() {
        let body: LenteCreate = serde_json::from_str(
            r#"{"folio":"A-1","od_esfera":-1.25,"od_eje":90,"oi_esfera":-1.5,"material":"CR-39"}"#,
        )
        .unwrap();
        assert_eq!(
            body.graduacion.od_esfera,
            Some(Decimal::from_str("-1.25").unwrap())
        );
        assert_eq!(body.graduacion.od_eje, Some(90));
        assert!(body.graduacion.oi_cilindro.is_none());
        assert_eq!(body.material.as_deref(), Some("CR-39"));
    }

    #[test]
    fn axis_out_of_range_is_invalid() {
        let ok = Graduacion {
            od_eje: Some(180),
            oi_eje: Some(0),
            ..Default::default()
        };
        assert!(ok.ejes_validos());

        let bad = Graduacion {
            oi_eje: Some(181),
            ..Default::default()
        };
        assert!(!bad.ejes_validos());
    }
}
