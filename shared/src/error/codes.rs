//! Unified error codes for the optical management API
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: People errors (users, employees, clients, patients)
//! - 4xxx: Sale errors
//! - 5xxx: Payment errors
//! - 6xxx: Lens errors
//! - 7xxx: Route errors (routes, deliveries, expenses)
//! - 8xxx: Notification and price catalog errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values so the dashboard can
/// switch on them without parsing messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,
    /// Too many requests from the same client
    TooManyRequests = 9,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1007,
    /// Password too short
    PasswordTooShort = 1008,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Admin (Matriz) role required
    AdminRequired = 2003,
    /// Cannot delete the account currently in use
    CannotDeleteSelf = 2006,

    // ==================== 3xxx: People ====================
    /// User not found
    UsuarioNotFound = 3001,
    /// Email already registered
    EmailAlreadyExists = 3002,
    /// Employee not found
    EmpleadoNotFound = 3101,
    /// Employee is still referenced by sales, lenses or routes
    EmpleadoInUse = 3102,
    /// Client not found
    ClienteNotFound = 3201,
    /// Client still has sales
    ClienteHasVentas = 3202,
    /// Patient not found
    PacienteNotFound = 3301,

    // ==================== 4xxx: Sale ====================
    /// Sale not found
    VentaNotFound = 4001,
    /// Folio already in use
    FolioExists = 4002,
    /// Sale is cancelled
    VentaCancelada = 4003,
    /// Sale has registered payments
    VentaHasPagos = 4004,
    /// New total is below the amount already paid
    TotalBelowPagado = 4005,

    // ==================== 5xxx: Payment ====================
    /// Payment not found
    PagoNotFound = 5001,
    /// Payment exceeds the outstanding balance
    PagoExcedeSaldo = 5002,
    /// Invalid amount
    InvalidAmount = 5003,

    // ==================== 6xxx: Lens ====================
    /// Lens not found
    LenteNotFound = 6001,
    /// Lens already delivered
    LenteAlreadyDelivered = 6002,
    /// Lens does not belong to the given folio
    LenteFolioMismatch = 6003,

    // ==================== 7xxx: Route ====================
    /// Route not found
    RutaNotFound = 7001,
    /// Route is not active
    RutaNotActive = 7002,
    /// Advisor already has an active route
    RutaAlreadyActive = 7003,
    /// Route counts do not reconcile with received items
    RutaUnreconciled = 7004,
    /// Count exceeds the items received on the route
    RutaCountExceeded = 7005,
    /// Route expense not found
    GastoNotFound = 7101,
    /// Delivery not found
    EntregaNotFound = 7201,

    // ==================== 8xxx: Notification / Catalog ====================
    /// Notification not found
    NotificacionNotFound = 8001,
    /// Price catalog entry not found
    PrecioNotFound = 8101,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the default user-facing message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",
            ErrorCode::TooManyRequests => "Too many requests, try again later",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotDeleteSelf => "Cannot delete the account in use",

            // People
            ErrorCode::UsuarioNotFound => "User not found",
            ErrorCode::EmailAlreadyExists => "Email is already registered",
            ErrorCode::EmpleadoNotFound => "Employee not found",
            ErrorCode::EmpleadoInUse => "Employee is referenced by other records",
            ErrorCode::ClienteNotFound => "Client not found",
            ErrorCode::ClienteHasVentas => "Client has registered sales",
            ErrorCode::PacienteNotFound => "Patient not found",

            // Sale
            ErrorCode::VentaNotFound => "Sale not found",
            ErrorCode::FolioExists => "Folio is already in use",
            ErrorCode::VentaCancelada => "Sale is cancelled",
            ErrorCode::VentaHasPagos => "Sale has registered payments",
            ErrorCode::TotalBelowPagado => "Total cannot be lower than the amount paid",

            // Payment
            ErrorCode::PagoNotFound => "Payment not found",
            ErrorCode::PagoExcedeSaldo => "Payment exceeds the outstanding balance",
            ErrorCode::InvalidAmount => "Amount must be greater than zero",

            // Lens
            ErrorCode::LenteNotFound => "Lens not found",
            ErrorCode::LenteAlreadyDelivered => "Lens has already been delivered",
            ErrorCode::LenteFolioMismatch => "Lens does not belong to this sale",

            // Route
            ErrorCode::RutaNotFound => "Route not found",
            ErrorCode::RutaNotActive => "Route is not active",
            ErrorCode::RutaAlreadyActive => "Advisor already has an active route",
            ErrorCode::RutaUnreconciled => "Route has items without delivery status",
            ErrorCode::RutaCountExceeded => "Count exceeds the items received",
            ErrorCode::GastoNotFound => "Route expense not found",
            ErrorCode::EntregaNotFound => "Delivery not found",

            // Notification / Catalog
            ErrorCode::NotificacionNotFound => "Notification not found",
            ErrorCode::PrecioNotFound => "Price entry not found",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error returned when converting an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),
            9 => Ok(ErrorCode::TooManyRequests),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1007 => Ok(ErrorCode::AccountDisabled),
            1008 => Ok(ErrorCode::PasswordTooShort),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2003 => Ok(ErrorCode::AdminRequired),
            2006 => Ok(ErrorCode::CannotDeleteSelf),

            // People
            3001 => Ok(ErrorCode::UsuarioNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyExists),
            3101 => Ok(ErrorCode::EmpleadoNotFound),
            3102 => Ok(ErrorCode::EmpleadoInUse),
            3201 => Ok(ErrorCode::ClienteNotFound),
            3202 => Ok(ErrorCode::ClienteHasVentas),
            3301 => Ok(ErrorCode::PacienteNotFound),

            // Sale
            4001 => Ok(ErrorCode::VentaNotFound),
            4002 => Ok(ErrorCode::FolioExists),
            4003 => Ok(ErrorCode::VentaCancelada),
            4004 => Ok(ErrorCode::VentaHasPagos),
            4005 => Ok(ErrorCode::TotalBelowPagado),

            // Payment
            5001 => Ok(ErrorCode::PagoNotFound),
            5002 => Ok(ErrorCode::PagoExcedeSaldo),
            5003 => Ok(ErrorCode::InvalidAmount),

            // Lens
            6001 => Ok(ErrorCode::LenteNotFound),
            6002 => Ok(ErrorCode::LenteAlreadyDelivered),
            6003 => Ok(ErrorCode::LenteFolioMismatch),

            // Route
            7001 => Ok(ErrorCode::RutaNotFound),
            7002 => Ok(ErrorCode::RutaNotActive),
            7003 => Ok(ErrorCode::RutaAlreadyActive),
            7004 => Ok(ErrorCode::RutaUnreconciled),
            7005 => Ok(ErrorCode::RutaCountExceeded),
            7101 => Ok(ErrorCode::GastoNotFound),
            7201 => Ok(ErrorCode::EntregaNotFound),

            // Notification / Catalog
            8001 => Ok(ErrorCode::NotificacionNotFound),
            8101 => Ok(ErrorCode::PrecioNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_values() {
        assert_eq!(ErrorCode::Success.code(), 0);
        assert_eq!(ErrorCode::NotFound.code(), 3);
        assert_eq!(ErrorCode::NotAuthenticated.code(), 1001);
        assert_eq!(ErrorCode::AdminRequired.code(), 2003);
        assert_eq!(ErrorCode::ClienteNotFound.code(), 3201);
        assert_eq!(ErrorCode::VentaNotFound.code(), 4001);
        assert_eq!(ErrorCode::PagoExcedeSaldo.code(), 5002);
        assert_eq!(ErrorCode::LenteNotFound.code(), 6001);
        assert_eq!(ErrorCode::RutaUnreconciled.code(), 7004);
        assert_eq!(ErrorCode::NotificacionNotFound.code(), 8001);
        assert_eq!(ErrorCode::InternalError.code(), 9001);
    }

    #[test]
    fn test_is_success() {
        assert!(ErrorCode::Success.is_success());
        assert!(!ErrorCode::NotFound.is_success());
    }

    #[test]
    fn test_try_from_valid() {
        assert_eq!(ErrorCode::try_from(0), Ok(ErrorCode::Success));
        assert_eq!(ErrorCode::try_from(4002), Ok(ErrorCode::FolioExists));
        assert_eq!(ErrorCode::try_from(7005), Ok(ErrorCode::RutaCountExceeded));
    }

    #[test]
    fn test_try_from_invalid() {
        assert_eq!(ErrorCode::try_from(6), Err(InvalidErrorCode(6)));
        assert_eq!(ErrorCode::try_from(65535), Err(InvalidErrorCode(65535)));
    }

    #[test]
    fn test_serialize_as_number() {
        let json = serde_json::to_string(&ErrorCode::PagoExcedeSaldo).unwrap();
        assert_eq!(json, "5002");

        let code: ErrorCode = serde_json::from_str("7001").unwrap();
        assert_eq!(code, ErrorCode::RutaNotFound);
    }

    #[test]
    fn test_deserialize_invalid() {
        let result: Result<ErrorCode, _> = serde_json::from_str("4999");
        assert!(result.is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", ErrorCode::VentaHasPagos), "4004");
    }

    #[test]
    fn test_roundtrip_every_code() {
        let codes = [
            ErrorCode::Success,
            ErrorCode::TooManyRequests,
            ErrorCode::PasswordTooShort,
            ErrorCode::CannotDeleteSelf,
            ErrorCode::EmpleadoInUse,
            ErrorCode::PacienteNotFound,
            ErrorCode::TotalBelowPagado,
            ErrorCode::InvalidAmount,
            ErrorCode::LenteFolioMismatch,
            ErrorCode::EntregaNotFound,
            ErrorCode::PrecioNotFound,
            ErrorCode::ConfigError,
        ];
        for code in codes {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }
}
