//! Sale balance arithmetic
//!
//! Pure functions over `Decimal`. The transactional callers in `db::pagos`
//! and `db::ventas` lock the sale row, feed the current balance in here and
//! persist whatever comes back.

use rust_decimal::{Decimal, RoundingStrategy};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{EstadoPago, EstadoVenta, Venta};

/// Slack allowed when comparing `pagado` against `total` (0.1)
pub const TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Upper bound for a single amount (10,000,000)
const MAX_MONTO: Decimal = Decimal::from_parts(10_000_000, 0, 0, false, 0);

/// Running balance of one sale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Balance {
    pub total: Decimal,
    pub pagado: Decimal,
    pub cancelada: bool,
}

impl Balance {
    pub fn new(total: Decimal, pagado: Decimal) -> Self {
        Self {
            total,
            pagado,
            cancelada: false,
        }
    }

    pub fn of(venta: &Venta) -> Self {
        Self {
            total: venta.total,
            pagado: venta.pagado,
            cancelada: venta.estado == EstadoVenta::Cancelado,
        }
    }

    /// Remaining amount (`total - pagado`)
    pub fn por_pagar(&self) -> Decimal {
        self.total - self.pagado
    }

    /// Status implied by the balance
    ///
    /// A cancelled sale stays cancelled whatever its balance.
    pub fn estado(&self) -> EstadoVenta {
        if self.cancelada {
            EstadoVenta::Cancelado
        } else if self.pagado >= self.total - TOLERANCE {
            EstadoVenta::Pagado
        } else {
            EstadoVenta::Pendiente
        }
    }

    /// Apply a new payment
    pub fn abonar(self, monto: Decimal) -> AppResult<Self> {
        if self.cancelada {
            return Err(AppError::new(ErrorCode::VentaCancelada));
        }
        let por_pagar = self.por_pagar();
        if monto > por_pagar + TOLERANCE {
            return Err(excede_saldo(monto, por_pagar));
        }
        Ok(Self {
            pagado: self.pagado + monto,
            ..self
        })
    }

    /// Replace an applied payment's amount
    pub fn ajustar(self, anterior: Decimal, nuevo: Decimal) -> AppResult<Self> {
        let diferencia = nuevo - anterior;
        if diferencia > Decimal::ZERO {
            if self.cancelada {
                return Err(AppError::new(ErrorCode::VentaCancelada));
            }
            if self.pagado + diferencia > self.total + TOLERANCE {
                return Err(excede_saldo(diferencia, self.por_pagar()));
            }
        }
        Ok(Self {
            pagado: (self.pagado + diferencia).max(Decimal::ZERO),
            ..self
        })
    }

    /// Remove an applied payment (floored at zero)
    pub fn revertir(self, monto: Decimal) -> Self {
        Self {
            pagado: (self.pagado - monto).max(Decimal::ZERO),
            ..self
        }
    }

    /// Change the sale total; refused when more than the new total is paid
    pub fn con_total(self, total: Decimal) -> AppResult<Self> {
        if total < Decimal::ZERO {
            return Err(AppError::with_message(
                ErrorCode::InvalidAmount,
                "Total must not be negative",
            ));
        }
        if self.pagado > total + TOLERANCE {
            return Err(AppError::new(ErrorCode::TotalBelowPagado)
                .with_detail("pagado", self.pagado.to_string())
                .with_detail("total", total.to_string()));
        }
        Ok(Self { total, ..self })
    }
}

/// One side of a payment row change: its amount and status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagoEstado {
    pub monto: Decimal,
    pub estado: EstadoPago,
}

/// Balance after a payment row moves from `antes` to `despues`
///
/// Only `Aplicado` payments count towards `pagado`.
pub fn transicion(balance: Balance, antes: PagoEstado, despues: PagoEstado) -> AppResult<Balance> {
    use EstadoPago::{Aplicado, Cancelado};

    match (antes.estado, despues.estado) {
        (Aplicado, Aplicado) => balance.ajustar(antes.monto, despues.monto),
        (Aplicado, Cancelado) => Ok(balance.revertir(antes.monto)),
        (Cancelado, Aplicado) => balance.abonar(despues.monto),
        (Cancelado, Cancelado) => Ok(balance),
    }
}

/// Validate a payment amount; returns it rounded to cents
pub fn validar_monto(monto: Decimal) -> AppResult<Decimal> {
    let monto = monto.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if monto <= Decimal::ZERO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            "Amount must be greater than zero",
        ));
    }
    if monto > MAX_MONTO {
        return Err(AppError::with_message(
            ErrorCode::InvalidAmount,
            format!("Amount exceeds the maximum allowed ({MAX_MONTO})"),
        ));
    }
    Ok(monto)
}

fn excede_saldo(monto: Decimal, por_pagar: Decimal) -> AppError {
    AppError::with_message(
        ErrorCode::PagoExcedeSaldo,
        format!("Amount {monto} exceeds the outstanding balance {por_pagar}"),
    )
    .with_detail("monto", monto.to_string())
    .with_detail("por_pagar", por_pagar.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn aplicado(monto: &str) -> PagoEstado {
        PagoEstado {
            monto: d(monto),
            estado: EstadoPago::Aplicado,
        }
    }

    fn cancelado(monto: &str) -> PagoEstado {
        PagoEstado {
            monto: d(monto),
            estado: EstadoPago::Cancelado,
        }
    }

    #[test]
    fn worked_example_600_500_400() {
        let b = Balance::new(d("1000"), Decimal::ZERO);

        let b = b.abonar(d("600")).unwrap();
        assert_eq!(b.pagado, d("600"));
        assert_eq!(b.estado(), EstadoVenta::Pendiente);

        let err = b.abonar(d("500")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PagoExcedeSaldo);
        assert_eq!(b.pagado, d("600"));

        let b = b.abonar(d("400")).unwrap();
        assert_eq!(b.pagado, d("1000"));
        assert_eq!(b.estado(), EstadoVenta::Pagado);
    }

    #[test]
    fn overpayment_within_tolerance_is_accepted() {
        let b = Balance::new(d("100"), d("50"));
        let b = b.abonar(d("50.10")).unwrap();
        assert_eq!(b.pagado, d("100.10"));
        assert_eq!(b.estado(), EstadoVenta::Pagado);

        let b = Balance::new(d("100"), d("50"));
        assert!(b.abonar(d("50.11")).is_err());
    }

    #[test]
    fn paid_within_tolerance_counts_as_paid() {
        assert_eq!(Balance::new(d("100"), d("99.90")).estado(), EstadoVenta::Pagado);
        assert_eq!(
            Balance::new(d("100"), d("99.89")).estado(),
            EstadoVenta::Pendiente
        );
    }

    #[test]
    fn update_guard_uses_delta() {
        let b = Balance::new(d("1000"), d("1000"));
        // 600 -> 500 frees 100
        let b = b.ajustar(d("600"), d("500")).unwrap();
        assert_eq!(b.pagado, d("900"));
        assert_eq!(b.estado(), EstadoVenta::Pendiente);

        // 500 -> 700 would reach 1100
        let err = b.ajustar(d("500"), d("700")).unwrap_err();
        assert_eq!(err.code, ErrorCode::PagoExcedeSaldo);

        let b = b.ajustar(d("500"), d("600")).unwrap();
        assert_eq!(b.pagado, d("1000"));
        assert_eq!(b.estado(), EstadoVenta::Pagado);
    }

    #[test]
    fn deleting_every_payment_returns_to_zero() {
        let pagos = ["250", "250", "300", "200"];
        let mut b = Balance::new(d("1000"), Decimal::ZERO);
        for p in pagos {
            b = b.abonar(d(p)).unwrap();
        }
        assert_eq!(b.estado(), EstadoVenta::Pagado);

        for p in pagos {
            b = b.revertir(d(p));
        }
        assert_eq!(b.pagado, Decimal::ZERO);
        assert_eq!(b.estado(), EstadoVenta::Pendiente);
    }

    #[test]
    fn revert_is_floored_at_zero() {
        let b = Balance::new(d("500"), d("100")).revertir(d("150"));
        assert_eq!(b.pagado, Decimal::ZERO);
    }

    #[test]
    fn pagado_never_exceeds_total_plus_tolerance() {
        // Deterministic mixed sequence of creates/updates/deletes
        let total = d("1000");
        let mut b = Balance::new(total, Decimal::ZERO);
        let mut aplicados: Vec<Decimal> = Vec::new();
        let intentos = [
            "300", "450", "400", "120.55", "0.05", "700", "10", "35.40", "99.99",
        ];

        for (i, m) in intentos.iter().enumerate() {
            let monto = d(m);
            match i % 3 {
                0 | 1 => {
                    if let Ok(next) = b.abonar(monto) {
                        b = next;
                        aplicados.push(monto);
                    }
                }
                _ => {
                    if let Some(prev) = aplicados.pop() {
                        match b.ajustar(prev, monto) {
                            Ok(next) => {
                                b = next;
                                aplicados.push(monto);
                            }
                            Err(_) => {
                                b = b.revertir(prev);
                            }
                        }
                    }
                }
            }
            assert!(b.pagado <= b.total + TOLERANCE, "step {i}: {b:?}");
            assert!(b.pagado >= Decimal::ZERO);
        }
    }

    #[test]
    fn status_transitions_follow_applied_only() {
        let b = Balance::new(d("1000"), d("600"));

        let b = transicion(b, aplicado("600"), cancelado("600")).unwrap();
        assert_eq!(b.pagado, Decimal::ZERO);

        let b = transicion(b, cancelado("600"), aplicado("600")).unwrap();
        assert_eq!(b.pagado, d("600"));

        let same = transicion(b, cancelado("50"), cancelado("80")).unwrap();
        assert_eq!(same, b);

        let err = transicion(
            Balance::new(d("100"), d("100")),
            cancelado("20"),
            aplicado("20"),
        )
        .unwrap_err();
        assert_eq!(err.code, ErrorCode::PagoExcedeSaldo);
    }

    #[test]
    fn cancelled_sale_rejects_new_payments() {
        let b = Balance {
            cancelada: true,
            ..Balance::new(d("1000"), d("200"))
        };
        assert_eq!(b.estado(), EstadoVenta::Cancelado);
        assert_eq!(
            b.abonar(d("10")).unwrap_err().code,
            ErrorCode::VentaCancelada
        );
        // Reductions still go through
        assert_eq!(b.ajustar(d("200"), d("150")).unwrap().pagado, d("150"));
        assert_eq!(b.revertir(d("200")).estado(), EstadoVenta::Cancelado);
    }

    #[test]
    fn total_edit_respects_paid_amount() {
        let b = Balance::new(d("1000"), d("800"));
        assert_eq!(
            b.con_total(d("700")).unwrap_err().code,
            ErrorCode::TotalBelowPagado
        );
        let b = b.con_total(d("800")).unwrap();
        assert_eq!(b.estado(), EstadoVenta::Pagado);
        let b = b.con_total(d("1200")).unwrap();
        assert_eq!(b.estado(), EstadoVenta::Pendiente);
        assert!(b.con_total(d("-1")).is_err());
    }

    #[test]
    fn amount_validation() {
        assert_eq!(validar_monto(d("10.005")).unwrap(), d("10.01"));
        assert_eq!(validar_monto(d("150.456")).unwrap(), d("150.46"));
        assert_eq!(
            validar_monto(Decimal::ZERO).unwrap_err().code,
            ErrorCode::InvalidAmount
        );
        assert!(validar_monto(d("-5")).is_err());
        assert!(validar_monto(d("0.001")).is_err());
        assert!(validar_monto(d("10000001")).is_err());
    }
}
