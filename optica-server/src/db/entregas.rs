//! Deliveries recorded on a route
//!
//! A delivery, its lens status, its optional payment and the route counter
//! are written in one transaction with the route row locked.

use shared::error::{AppError, ErrorCode};
use shared::models::{
    EstadoEntrega, EstadoRuta, Entrega, EntregaCreate, EntregaUpdate, MetodoPago, PagoCreate,
    TipoEntrega,
};
use sqlx::{MySqlConnection, MySqlPool};

use crate::db::{lentes, pagos, rutas, ventas};
use crate::error::{ServiceError, ServiceResult};
use crate::services::route_close;

pub async fn list(pool: &MySqlPool) -> ServiceResult<Vec<Entrega>> {
    let rows = sqlx::query_as::<_, Entrega>(
        r#"
        SELECT identrega, idruta, tipo, folio, idlente, idpago, fecha, observaciones
        FROM entregas
        ORDER BY fecha DESC
        "#,
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn list_by_ruta(pool: &MySqlPool, idruta: i64) -> ServiceResult<Vec<Entrega>> {
    let rows = sqlx::query_as::<_, Entrega>(
        r#"
        SELECT identrega, idruta, tipo, folio, idlente, idpago, fecha, observaciones
        FROM entregas
        WHERE idruta = ?
        ORDER BY fecha
        "#,
    )
    .bind(idruta)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &MySqlPool, identrega: i64) -> ServiceResult<Option<Entrega>> {
    let row = sqlx::query_as::<_, Entrega>(
        r#"
        SELECT identrega, idruta, tipo, folio, idlente, idpago, fecha, observaciones
        FROM entregas
        WHERE identrega = ?
        "#,
    )
    .bind(identrega)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

async fn fetch(conn: &mut MySqlConnection, identrega: i64) -> ServiceResult<Entrega> {
    sqlx::query_as::<_, Entrega>(
        r#"
        SELECT identrega, idruta, tipo, folio, idlente, idpago, fecha, observaciones
        FROM entregas
        WHERE identrega = ?
        "#,
    )
    .bind(identrega)
    .fetch_optional(conn)
    .await?
    .ok_or_else(|| AppError::new(ErrorCode::EntregaNotFound).into())
}

/// Record a delivery on an active route
///
/// `cobrador` is the employee credited with any payment collected.
pub async fn create(
    pool: &MySqlPool,
    data: &EntregaCreate,
    cobrador: Option<i64>,
) -> ServiceResult<Entrega> {
    let folio = data.folio.trim();
    if folio.is_empty() {
        return Err(AppError::new(ErrorCode::RequiredField)
            .with_detail("field", "folio")
            .into());
    }

    let mut tx = pool.begin().await?;
    let ruta = rutas::lock(&mut tx, data.idruta).await?;
    route_close::validar_entrega(&ruta, data.tipo)?;

    let idlente = match data.tipo {
        TipoEntrega::Lente => {
            let idlente = data.idlente.ok_or_else(|| {
                AppError::new(ErrorCode::RequiredField).with_detail("field", "idlente")
            })?;
            lentes::marcar_entregado(&mut tx, idlente, folio).await?;
            Some(idlente)
        }
        TipoEntrega::Tarjeta => None,
    };

    let idpago = match data.monto {
        Some(monto) => {
            let pago = PagoCreate {
                folio: folio.to_string(),
                monto,
                fecha: None,
                metodo: data.metodo.unwrap_or(MetodoPago::Efectivo),
                idcobrador: None,
            };
            Some(pagos::aplicar(&mut tx, &pago, cobrador).await?.idpago)
        }
        None => None,
    };

    rutas::sumar_entrega(&mut tx, ruta.idruta, data.tipo).await?;

    let result = sqlx::query(
        r#"
        INSERT INTO entregas (idruta, tipo, folio, idlente, idpago, fecha, observaciones)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(ruta.idruta)
    .bind(data.tipo.as_str())
    .bind(folio)
    .bind(idlente)
    .bind(idpago)
    .bind(shared::util::now())
    .bind(&data.observaciones)
    .execute(&mut *tx)
    .await
    .map_err(|e| match ServiceError::foreign_key_or_db(e, ErrorCode::VentaNotFound) {
        ServiceError::App(_) => ventas::venta_not_found(folio),
        other => other,
    })?;

    let entrega = fetch(&mut tx, result.last_insert_id() as i64).await?;
    tx.commit().await?;

    tracing::info!(
        identrega = entrega.identrega,
        idruta = entrega.idruta,
        tipo = %entrega.tipo,
        folio = %entrega.folio,
        "Delivery recorded"
    );
    Ok(entrega)
}

pub async fn update(pool: &MySqlPool, identrega: i64, data: &EntregaUpdate) -> ServiceResult<Entrega> {
    let mut tx = pool.begin().await?;
    sqlx::query("UPDATE entregas SET observaciones = COALESCE(?, observaciones) WHERE identrega = ?")
        .bind(&data.observaciones)
        .bind(identrega)
        .execute(&mut *tx)
        .await?;
    let entrega = fetch(&mut tx, identrega).await?;
    tx.commit().await?;
    Ok(entrega)
}

/// Remove a delivery
///
/// On an active route the delivered counter goes back down and a delivered
/// lens returns to `Pendiente`. A linked payment is kept; it is removed
/// through the payments endpoint.
pub async fn delete(pool: &MySqlPool, identrega: i64) -> ServiceResult<()> {
    let mut tx = pool.begin().await?;
    let entrega = fetch(&mut tx, identrega).await?;
    let ruta = rutas::lock(&mut tx, entrega.idruta).await?;

    if ruta.estado == EstadoRuta::Activa {
        rutas::restar_entrega(&mut tx, ruta.idruta, entrega.tipo).await?;
        if let Some(idlente) = entrega.idlente {
            sqlx::query(
                "UPDATE lentes SET estado_entrega = ?, fecha_entrega = NULL WHERE idlente = ?",
            )
            .bind(EstadoEntrega::Pendiente.as_str())
            .bind(idlente)
            .execute(&mut *tx)
            .await?;
        }
    }

    sqlx::query("DELETE FROM entregas WHERE identrega = ?")
        .bind(identrega)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
