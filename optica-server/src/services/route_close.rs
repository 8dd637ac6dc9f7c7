//! Route counter reconciliation
//!
//! remaining = received - delivered - undelivered, per item type.
//! A route can only be finalized once both remainders are zero.

use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{EstadoRuta, NoEntregadosInput, Ruta, TipoEntrega};

/// Counters for one item type on a route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contadores {
    pub recibidos: i32,
    pub entregados: i32,
    pub no_entregados: i32,
}

impl Contadores {
    pub fn lentes(ruta: &Ruta) -> Self {
        Self {
            recibidos: ruta.lentes_recibidos,
            entregados: ruta.lentes_entregados,
            no_entregados: ruta.lentes_no_entregados,
        }
    }

    pub fn tarjetas(ruta: &Ruta) -> Self {
        Self {
            recibidos: ruta.tarjetas_recibidas,
            entregados: ruta.tarjetas_entregadas,
            no_entregados: ruta.tarjetas_no_entregadas,
        }
    }

    pub fn de(ruta: &Ruta, tipo: TipoEntrega) -> Self {
        match tipo {
            TipoEntrega::Lente => Self::lentes(ruta),
            TipoEntrega::Tarjeta => Self::tarjetas(ruta),
        }
    }

    pub fn pendientes(&self) -> i32 {
        (self.recibidos - self.entregados - self.no_entregados).max(0)
    }
}

/// Remaining (lentes, tarjetas)
pub fn pendientes(ruta: &Ruta) -> (i32, i32) {
    (
        Contadores::lentes(ruta).pendientes(),
        Contadores::tarjetas(ruta).pendientes(),
    )
}

pub fn exigir_activa(ruta: &Ruta) -> AppResult<()> {
    if ruta.estado != EstadoRuta::Activa {
        return Err(AppError::with_message(
            ErrorCode::RutaNotActive,
            format!("Route {} is already finalized", ruta.idruta),
        ));
    }
    Ok(())
}

/// Check that one more delivery of `tipo` fits on the route
pub fn validar_entrega(ruta: &Ruta, tipo: TipoEntrega) -> AppResult<()> {
    exigir_activa(ruta)?;
    let c = Contadores::de(ruta, tipo);
    if c.pendientes() < 1 {
        return Err(AppError::with_message(
            ErrorCode::RutaCountExceeded,
            format!(
                "No {} left to deliver on route {}",
                etiqueta(tipo),
                ruta.idruta
            ),
        )
        .with_detail("recibidos", c.recibidos)
        .with_detail("entregados", c.entregados)
        .with_detail("no_entregados", c.no_entregados));
    }
    Ok(())
}

/// Check submitted undelivered counts against what is still outstanding
///
/// Counts replace the stored ones, so the bound is `recibidos - entregados`.
pub fn validar_no_entregados(ruta: &Ruta, input: &NoEntregadosInput) -> AppResult<()> {
    exigir_activa(ruta)?;

    for (tipo, valor) in [
        (TipoEntrega::Lente, input.lentes_no_entregados),
        (TipoEntrega::Tarjeta, input.tarjetas_no_entregadas),
    ] {
        let c = Contadores::de(ruta, tipo);
        if valor < 0 {
            return Err(AppError::with_message(
                ErrorCode::ValueOutOfRange,
                format!("Undelivered {} must not be negative", etiqueta(tipo)),
            ));
        }
        let maximo = c.recibidos - c.entregados;
        if valor > maximo {
            return Err(AppError::with_message(
                ErrorCode::RutaCountExceeded,
                format!(
                    "Undelivered {} ({valor}) exceed the outstanding count ({maximo})",
                    etiqueta(tipo)
                ),
            )
            .with_detail("maximo", maximo));
        }
    }
    Ok(())
}

/// Finalizing requires every received item to be accounted for
pub fn validar_finalizar(ruta: &Ruta) -> AppResult<()> {
    exigir_activa(ruta)?;
    let (lentes, tarjetas) = pendientes(ruta);
    if lentes > 0 || tarjetas > 0 {
        return Err(AppError::with_message(
            ErrorCode::RutaUnreconciled,
            format!(
                "Route {} still has {lentes} lenses and {tarjetas} cards unaccounted for",
                ruta.idruta
            ),
        )
        .with_detail("lentes_pendientes", lentes)
        .with_detail("tarjetas_pendientes", tarjetas));
    }
    Ok(())
}

/// Admin correction of received counts must still cover what was recorded
///
/// Counts on a closed route are frozen.
pub fn validar_recibidos(ruta: &Ruta, lentes: i32, tarjetas: i32) -> AppResult<()> {
    if lentes != ruta.lentes_recibidos || tarjetas != ruta.tarjetas_recibidas {
        exigir_activa(ruta)?;
    }
    let lentes_min = ruta.lentes_entregados + ruta.lentes_no_entregados;
    let tarjetas_min = ruta.tarjetas_entregadas + ruta.tarjetas_no_entregadas;
    if lentes < lentes_min || tarjetas < tarjetas_min {
        return Err(AppError::with_message(
            ErrorCode::RutaCountExceeded,
            "Received counts cannot be lower than the items already recorded",
        )
        .with_detail("lentes_minimo", lentes_min)
        .with_detail("tarjetas_minimo", tarjetas_min));
    }
    Ok(())
}

/// Advisor an active route is being handed to, if it changes hands
pub fn nuevo_asesor(ruta: &Ruta, idasesor: Option<i64>) -> Option<i64> {
    idasesor.filter(|&id| id != ruta.idasesor && ruta.estado == EstadoRuta::Activa)
}

fn etiqueta(tipo: TipoEntrega) -> &'static str {
    match tipo {
        TipoEntrega::Lente => "lenses",
        TipoEntrega::Tarjeta => "cards",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ruta(lentes: (i32, i32, i32), tarjetas: (i32, i32, i32)) -> Ruta {
        let fecha = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        Ruta {
            idruta: 1,
            idasesor: 4,
            fecha,
            hora_inicio: fecha.and_hms_opt(8, 0, 0).unwrap(),
            hora_fin: None,
            lentes_recibidos: lentes.0,
            lentes_entregados: lentes.1,
            lentes_no_entregados: lentes.2,
            tarjetas_recibidas: tarjetas.0,
            tarjetas_entregadas: tarjetas.1,
            tarjetas_no_entregadas: tarjetas.2,
            estado: EstadoRuta::Activa,
        }
    }

    #[test]
    fn remaining_per_type() {
        let r = ruta((10, 6, 1), (5, 5, 0));
        assert_eq!(pendientes(&r), (3, 0));
    }

    #[test]
    fn cannot_finalize_with_remaining_items() {
        let r = ruta((10, 6, 1), (5, 5, 0));
        let err = validar_finalizar(&r).unwrap_err();
        assert_eq!(err.code, ErrorCode::RutaUnreconciled);
        let details = err.details.unwrap();
        assert_eq!(details["lentes_pendientes"], 3);

        let r = ruta((10, 6, 4), (5, 4, 0));
        assert_eq!(
            validar_finalizar(&r).unwrap_err().code,
            ErrorCode::RutaUnreconciled
        );

        let r = ruta((10, 6, 4), (5, 3, 2));
        assert!(validar_finalizar(&r).is_ok());
    }

    #[test]
    fn finalized_route_rejects_everything() {
        let mut r = ruta((1, 1, 0), (0, 0, 0));
        r.estado = EstadoRuta::Finalizada;
        assert_eq!(
            validar_finalizar(&r).unwrap_err().code,
            ErrorCode::RutaNotActive
        );
        assert_eq!(
            validar_entrega(&r, TipoEntrega::Lente).unwrap_err().code,
            ErrorCode::RutaNotActive
        );
        assert!(validar_no_entregados(&r, &NoEntregadosInput::default()).is_err());
    }

    #[test]
    fn delivery_cannot_exceed_received() {
        let r = ruta((2, 1, 1), (3, 0, 0));
        assert_eq!(
            validar_entrega(&r, TipoEntrega::Lente).unwrap_err().code,
            ErrorCode::RutaCountExceeded
        );
        assert!(validar_entrega(&r, TipoEntrega::Tarjeta).is_ok());
    }

    #[test]
    fn undelivered_bounded_by_outstanding() {
        let r = ruta((10, 6, 0), (5, 2, 0));
        let ok = NoEntregadosInput {
            lentes_no_entregados: 4,
            tarjetas_no_entregadas: 3,
        };
        assert!(validar_no_entregados(&r, &ok).is_ok());

        let too_many = NoEntregadosInput {
            lentes_no_entregados: 5,
            tarjetas_no_entregadas: 0,
        };
        assert_eq!(
            validar_no_entregados(&r, &too_many).unwrap_err().code,
            ErrorCode::RutaCountExceeded
        );

        let negative = NoEntregadosInput {
            lentes_no_entregados: 0,
            tarjetas_no_entregadas: -1,
        };
        assert_eq!(
            validar_no_entregados(&r, &negative).unwrap_err().code,
            ErrorCode::ValueOutOfRange
        );
    }

    #[test]
    fn close_out_flow_reconciles() {
        // start: 3 lenses, 2 cards
        let mut r = ruta((3, 0, 0), (2, 0, 0));

        for _ in 0..2 {
            validar_entrega(&r, TipoEntrega::Lente).unwrap();
            r.lentes_entregados += 1;
        }
        validar_entrega(&r, TipoEntrega::Tarjeta).unwrap();
        r.tarjetas_entregadas += 1;
        assert!(validar_finalizar(&r).is_err());

        let input = NoEntregadosInput {
            lentes_no_entregados: 1,
            tarjetas_no_entregadas: 1,
        };
        validar_no_entregados(&r, &input).unwrap();
        r.lentes_no_entregados = input.lentes_no_entregados;
        r.tarjetas_no_entregadas = input.tarjetas_no_entregadas;

        assert_eq!(pendientes(&r), (0, 0));
        assert!(validar_finalizar(&r).is_ok());
    }

    #[test]
    fn received_correction_keeps_recorded_items() {
        let r = ruta((5, 3, 1), (2, 2, 0));
        assert!(validar_recibidos(&r, 4, 2).is_ok());
        assert!(validar_recibidos(&r, 3, 2).is_err());
        assert!(validar_recibidos(&r, 5, 1).is_err());
    }

    #[test]
    fn received_counts_frozen_once_finalized() {
        let mut r = ruta((3, 2, 1), (2, 2, 0));
        r.estado = EstadoRuta::Finalizada;
        assert_eq!(
            validar_recibidos(&r, 10, 2).unwrap_err().code,
            ErrorCode::RutaNotActive
        );
        assert_eq!(
            validar_recibidos(&r, 3, 5).unwrap_err().code,
            ErrorCode::RutaNotActive
        );
        // unchanged counts still allow header edits
        assert!(validar_recibidos(&r, 3, 2).is_ok());
        assert_eq!(pendientes(&r), (0, 0));
    }

    #[test]
    fn handing_over_active_route() {
        let r = ruta((3, 0, 0), (0, 0, 0));
        assert_eq!(nuevo_asesor(&r, Some(5)), Some(5));
        assert_eq!(nuevo_asesor(&r, Some(r.idasesor)), None);
        assert_eq!(nuevo_asesor(&r, None), None);

        let mut cerrada = r.clone();
        cerrada.estado = EstadoRuta::Finalizada;
        assert_eq!(nuevo_asesor(&cerrada, Some(5)), None);
    }
}
