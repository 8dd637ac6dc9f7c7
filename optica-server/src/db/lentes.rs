//! Lenses (prescriptions attached to a sale)

use shared::error::{AppError, ErrorCode};
use shared::models::{EstadoEntrega, Graduacion, Lente, LenteCreate, LenteUpdate};
use sqlx::{MySqlConnection, MySqlPool};

use crate::db::ventas;
use crate::error::{ServiceError, ServiceResult};

const COLUMNS: &str = "idlente, folio, idoptometrista, idpaciente, \
    od_esfera, od_cilindro, od_eje, od_adicion, \
    oi_esfera, oi_cilindro, oi_eje, oi_adicion, distancia_pupilar, \
    material, tratamiento, armazon, fecha_examen, fecha_entrega, estado_entrega, observaciones";

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Lente>> {
    let sql = format!("SELECT {COLUMNS} FROM lentes ORDER BY fecha_examen DESC, idlente DESC");
    let rows = sqlx::query_as::<_, Lente>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn list_by_folio(pool: &MySqlPool, folio: &str) -> ServiceResult<Vec<Lente>> {
    let sql = format!("SELECT {COLUMNS} FROM lentes WHERE folio = ? ORDER BY idlente");
    let rows = sqlx::query_as::<_, Lente>(&sql)
        .bind(folio)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, idlente: i64) -> ServiceResult<Option<Lente>> {
    let sql = format!("SELECT {COLUMNS} FROM lentes WHERE idlente = ?");
    let row = sqlx::query_as::<_, Lente>(&sql)
        .bind(idlente)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

fn validar_graduacion(graduacion: &Graduacion) -> Result<(), AppError> {
    if !graduacion.ejes_validos() {
        return Err(AppError::with_message(
            ErrorCode::ValueOutOfRange,
            "Axis must be between 0 and 180",
        ));
    }
    Ok(())
}

/// Unknown optometrist or patient ids
fn referencia_invalida(e: sqlx::Error) -> ServiceError {
    match ServiceError::foreign_key_or_db(e, ErrorCode::ValidationFailed) {
        ServiceError::App(_) => AppError::validation("Unknown optometrist or patient").into(),
        other => other,
    }
}

pub async fn create(
    pool: &MySqlPool,
    data: &LenteCreate,
    optometrista_por_defecto: Option<i64>,
) -> ServiceResult<Lente> {
    validar_graduacion(&data.graduacion)?;
    if ventas::find_by_folio(pool, &data.folio).await?.is_none() {
        return Err(ventas::venta_not_found(&data.folio));
    }

    let g = &data.graduacion;
    let result = sqlx::query(
        r#"
        INSERT INTO lentes (
            folio, idoptometrista, idpaciente,
            od_esfera, od_cilindro, od_eje, od_adicion,
            oi_esfera, oi_cilindro, oi_eje, oi_adicion, distancia_pupilar,
            material, tratamiento, armazon, fecha_examen, estado_entrega, observaciones
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&data.folio)
    .bind(data.idoptometrista.or(optometrista_por_defecto))
    .bind(data.idpaciente)
    .bind(g.od_esfera)
    .bind(g.od_cilindro)
    .bind(g.od_eje)
    .bind(g.od_adicion)
    .bind(g.oi_esfera)
    .bind(g.oi_cilindro)
    .bind(g.oi_eje)
    .bind(g.oi_adicion)
    .bind(g.distancia_pupilar)
    .bind(&data.material)
    .bind(&data.tratamiento)
    .bind(&data.armazon)
    .bind(data.fecha_examen.unwrap_or_else(shared::util::today))
    .bind(EstadoEntrega::Pendiente.as_str())
    .bind(&data.observaciones)
    .execute(pool)
    .await
    .map_err(referencia_invalida)?;

    let id = result.last_insert_id() as i64;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LenteNotFound).into())
}

pub async fn update(pool: &MySqlPool, idlente: i64, data: &LenteUpdate) -> ServiceResult<Lente> {
    validar_graduacion(&data.graduacion)?;

    // Marking a lens delivered without a date stamps today
    let fecha_entrega = data.fecha_entrega.or(match data.estado_entrega {
        Some(EstadoEntrega::Entregado) => Some(shared::util::today()),
        _ => None,
    });

    let g = &data.graduacion;
    let mut tx = pool.begin().await?;
    sqlx::query(
        r#"
        UPDATE lentes SET
            idoptometrista = COALESCE(?, idoptometrista),
            idpaciente = COALESCE(?, idpaciente),
            od_esfera = COALESCE(?, od_esfera),
            od_cilindro = COALESCE(?, od_cilindro),
            od_eje = COALESCE(?, od_eje),
            od_adicion = COALESCE(?, od_adicion),
            oi_esfera = COALESCE(?, oi_esfera),
            oi_cilindro = COALESCE(?, oi_cilindro),
            oi_eje = COALESCE(?, oi_eje),
            oi_adicion = COALESCE(?, oi_adicion),
            distancia_pupilar = COALESCE(?, distancia_pupilar),
            material = COALESCE(?, material),
            tratamiento = COALESCE(?, tratamiento),
            armazon = COALESCE(?, armazon),
            fecha_examen = COALESCE(?, fecha_examen),
            fecha_entrega = COALESCE(?, fecha_entrega),
            estado_entrega = COALESCE(?, estado_entrega),
            observaciones = COALESCE(?, observaciones)
        WHERE idlente = ?
        "#,
    )
    .bind(data.idoptometrista)
    .bind(data.idpaciente)
    .bind(g.od_esfera)
    .bind(g.od_cilindro)
    .bind(g.od_eje)
    .bind(g.od_adicion)
    .bind(g.oi_esfera)
    .bind(g.oi_cilindro)
    .bind(g.oi_eje)
    .bind(g.oi_adicion)
    .bind(g.distancia_pupilar)
    .bind(&data.material)
    .bind(&data.tratamiento)
    .bind(&data.armazon)
    .bind(data.fecha_examen)
    .bind(fecha_entrega)
    .bind(data.estado_entrega.map(|e| e.as_str()))
    .bind(&data.observaciones)
    .bind(idlente)
    .execute(&mut *tx)
    .await
    .map_err(referencia_invalida)?;

    let sql = format!("SELECT {COLUMNS} FROM lentes WHERE idlente = ?");
    let lente = sqlx::query_as::<_, Lente>(&sql)
        .bind(idlente)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LenteNotFound))?;

    tx.commit().await?;
    Ok(lente)
}

pub async fn delete(pool: &MySqlPool, idlente: i64) -> ServiceResult<()> {
    let rows = sqlx::query("DELETE FROM lentes WHERE idlente = ?")
        .bind(idlente)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(AppError::new(ErrorCode::LenteNotFound).into());
    }
    Ok(())
}

/// Mark a lens of `folio` delivered today, inside an open transaction
pub(crate) async fn marcar_entregado(
    conn: &mut MySqlConnection,
    idlente: i64,
    folio: &str,
) -> ServiceResult<()> {
    let sql = format!("SELECT {COLUMNS} FROM lentes WHERE idlente = ? FOR UPDATE");
    let lente = sqlx::query_as::<_, Lente>(&sql)
        .bind(idlente)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::LenteNotFound))?;

    verificar_entregable(&lente, folio)?;

    sqlx::query("UPDATE lentes SET estado_entrega = ?, fecha_entrega = ? WHERE idlente = ?")
        .bind(EstadoEntrega::Entregado.as_str())
        .bind(shared::util::today())
        .bind(idlente)
        .execute(conn)
        .await?;
    Ok(())
}

fn verificar_entregable(lente: &Lente, folio: &str) -> Result<(), AppError> {
    if lente.folio != folio {
        return Err(AppError::new(ErrorCode::LenteFolioMismatch)
            .with_detail("idlente", lente.idlente)
            .with_detail("folio", lente.folio.as_str()));
    }
    if lente.estado_entrega == EstadoEntrega::Entregado {
        return Err(AppError::new(ErrorCode::LenteAlreadyDelivered).with_detail("idlente", lente.idlente));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn lente(folio: &str, estado: EstadoEntrega) -> Lente {
        Lente {
            idlente: 9,
            folio: folio.into(),
            idoptometrista: Some(2),
            idpaciente: None,
            graduacion: Graduacion::default(),
            material: None,
            tratamiento: None,
            armazon: None,
            fecha_examen: NaiveDate::from_ymd_opt(2024, 5, 2).unwrap(),
            fecha_entrega: None,
            estado_entrega: estado,
            observaciones: None,
        }
    }

    #[test]
    fn lens_must_belong_to_folio() {
        let err = verificar_entregable(&lente("A-1", EstadoEntrega::Pendiente), "A-2").unwrap_err();
        assert_eq!(err.code, ErrorCode::LenteFolioMismatch);
    }

    #[test]
    fn lens_delivered_once() {
        let err = verificar_entregable(&lente("A-1", EstadoEntrega::Entregado), "A-1").unwrap_err();
        assert_eq!(err.code, ErrorCode::LenteAlreadyDelivered);
        assert!(verificar_entregable(&lente("A-1", EstadoEntrega::NoEntregado), "A-1").is_ok());
        assert!(verificar_entregable(&lente("A-1", EstadoEntrega::Pendiente), "A-1").is_ok());
    }

    #[test]
    fn axis_out_of_range_rejected() {
        let g = Graduacion {
            od_eje: Some(181),
            ..Default::default()
        };
        assert_eq!(validar_graduacion(&g).unwrap_err().code, ErrorCode::ValueOutOfRange);
        assert!(validar_graduacion(&Graduacion::default()).is_ok());
    }
}
