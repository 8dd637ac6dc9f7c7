//! Dashboard summary

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Counts and money totals shown on the admin dashboard
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResumenGeneral {
    pub clientes: i64,
    pub ventas_pendientes: i64,
    pub ventas_pagadas: i64,
    pub ventas_canceladas: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_vendido: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_cobrado: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub saldo_pendiente: Decimal,
    pub rutas_activas: i64,
    pub lentes_pendientes: i64,
    #[serde(with = "rust_decimal::serde::float")]
    pub total_gastos_ruta: Decimal,
}
