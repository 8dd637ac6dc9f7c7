//! Data models
//!
//! Shared between the server and the dashboard (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Enum columns are stored as VARCHAR and decoded through `TryFrom<String>`,
//! so the wire value and the column value are the same literal.
//! Money fields are `Decimal` on the Rust side and JSON numbers on the wire.

use thiserror::Error;

/// Column or payload value that does not name a known variant
#[derive(Debug, Clone, Error)]
#[error("invalid {kind} value: {value}")]
pub struct InvalidEnumValue {
    pub kind: &'static str,
    pub value: String,
}

/// Declares a string-backed enum usable both as a JSON value and as a
/// VARCHAR column.
macro_rules! db_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $name {
            /// Literal stored in the database and sent on the wire
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $text ),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::models::InvalidEnumValue;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $( $text => Ok(Self::$variant), )+
                    other => Err($crate::models::InvalidEnumValue {
                        kind: stringify!($name),
                        value: other.to_string(),
                    }),
                }
            }
        }

        impl TryFrom<String> for $name {
            type Error = $crate::models::InvalidEnumValue;

            fn try_from(value: String) -> Result<Self, Self::Error> {
                value.parse()
            }
        }
    };
}

pub mod cliente;
pub mod empleado;
pub mod entrega;
pub mod gasto_ruta;
pub mod lente;
pub mod notificacion;
pub mod paciente;
pub mod pago;
pub mod precio;
pub mod reporte;
pub mod ruta;
pub mod usuario;
pub mod venta;

// Re-exports
pub use cliente::*;
pub use empleado::*;
pub use entrega::*;
pub use gasto_ruta::*;
pub use lente::*;
pub use notificacion::*;
pub use paciente::*;
pub use pago::*;
pub use precio::*;
pub use reporte::*;
pub use ruta::*;
pub use usuario::*;
pub use venta::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enum_literals_match_wire_and_column() {
        assert_eq!(Rol::Matriz.as_str(), "Matriz");
        assert_eq!(EstadoVenta::Pendiente.to_string(), "Pendiente");
        assert_eq!(EstadoEntrega::NoEntregado.as_str(), "NoEntregado");
        assert_eq!(
            serde_json::to_string(&EstadoRuta::Finalizada).unwrap(),
            "\"Finalizada\""
        );
        assert_eq!(
            serde_json::from_str::<TipoEntrega>("\"Tarjeta\"").unwrap(),
            TipoEntrega::Tarjeta
        );
    }

    #[test]
    fn unknown_column_value_is_rejected() {
        let err = EstadoPago::try_from("Reembolsado".to_string()).unwrap_err();
        assert_eq!(err.kind, "EstadoPago");
        assert_eq!(err.value, "Reembolsado");
        assert_eq!(err.to_string(), "invalid EstadoPago value: Reembolsado");
    }

    #[test]
    fn parse_roundtrips_every_role() {
        for rol in [Rol::Matriz, Rol::Asesor, Rol::Optometrista] {
            assert_eq!(rol.as_str().parse::<Rol>().unwrap(), rol);
        }
    }
}
