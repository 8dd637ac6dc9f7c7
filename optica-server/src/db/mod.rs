//! Data access layer (MySQL)
//!
//! One module per table. Multi-step writes that touch a sale balance or a
//! route's counters run in a transaction that locks the parent row first.

pub mod clientes;
pub mod empleados;
pub mod entregas;
pub mod gastos_ruta;
pub mod lentes;
pub mod notificaciones;
pub mod pacientes;
pub mod pagos;
pub mod precios;
pub mod reportes;
pub mod rutas;
pub mod usuarios;
pub mod ventas;
