//! Error category classification

use super::codes::ErrorCode;
use serde::{Deserialize, Serialize};

/// Error category classification based on error code ranges
///
/// Categories are determined by the leading digit of the error code:
/// - 0xxx: General errors
/// - 1xxx: Authentication errors
/// - 2xxx: Permission errors
/// - 3xxx: People errors
/// - 4xxx: Sale errors
/// - 5xxx: Payment errors
/// - 6xxx: Lens errors
/// - 7xxx: Route errors
/// - 8xxx: Notification / catalog errors
/// - 9xxx: System errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// General errors (0xxx)
    General,
    /// Authentication errors (1xxx)
    Auth,
    /// Permission errors (2xxx)
    Permission,
    /// People errors (3xxx)
    People,
    /// Sale errors (4xxx)
    Sale,
    /// Payment errors (5xxx)
    Payment,
    /// Lens errors (6xxx)
    Lens,
    /// Route errors (7xxx)
    Route,
    /// Notification and catalog errors (8xxx)
    Notice,
    /// System errors (9xxx)
    System,
}

impl ErrorCategory {
    /// Determine category from error code value
    pub fn from_code(code: u16) -> Self {
        match code {
            0..1000 => Self::General,
            1000..2000 => Self::Auth,
            2000..3000 => Self::Permission,
            3000..4000 => Self::People,
            4000..5000 => Self::Sale,
            5000..6000 => Self::Payment,
            6000..7000 => Self::Lens,
            7000..8000 => Self::Route,
            8000..9000 => Self::Notice,
            _ => Self::System,
        }
    }

    /// Get the string name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Self::General => "general",
            Self::Auth => "auth",
            Self::Permission => "permission",
            Self::People => "people",
            Self::Sale => "sale",
            Self::Payment => "payment",
            Self::Lens => "lens",
            Self::Route => "route",
            Self::Notice => "notice",
            Self::System => "system",
        }
    }
}

impl ErrorCode {
    /// Get the category for this error code
    pub fn category(&self) -> ErrorCategory {
        ErrorCategory::from_code(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_from_code() {
        assert_eq!(ErrorCategory::from_code(0), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(999), ErrorCategory::General);
        assert_eq!(ErrorCategory::from_code(1001), ErrorCategory::Auth);
        assert_eq!(ErrorCategory::from_code(2001), ErrorCategory::Permission);
        assert_eq!(ErrorCategory::from_code(3201), ErrorCategory::People);
        assert_eq!(ErrorCategory::from_code(4001), ErrorCategory::Sale);
        assert_eq!(ErrorCategory::from_code(5002), ErrorCategory::Payment);
        assert_eq!(ErrorCategory::from_code(6001), ErrorCategory::Lens);
        assert_eq!(ErrorCategory::from_code(7004), ErrorCategory::Route);
        assert_eq!(ErrorCategory::from_code(8101), ErrorCategory::Notice);
        assert_eq!(ErrorCategory::from_code(9001), ErrorCategory::System);
        assert_eq!(ErrorCategory::from_code(10000), ErrorCategory::System);
    }

    #[test]
    fn test_error_code_category() {
        assert_eq!(ErrorCode::NotAuthenticated.category(), ErrorCategory::Auth);
        assert_eq!(ErrorCode::AdminRequired.category(), ErrorCategory::Permission);
        assert_eq!(ErrorCode::ClienteNotFound.category(), ErrorCategory::People);
        assert_eq!(ErrorCode::FolioExists.category(), ErrorCategory::Sale);
        assert_eq!(ErrorCode::PagoExcedeSaldo.category(), ErrorCategory::Payment);
        assert_eq!(ErrorCode::LenteAlreadyDelivered.category(), ErrorCategory::Lens);
        assert_eq!(ErrorCode::RutaNotActive.category(), ErrorCategory::Route);
        assert_eq!(ErrorCode::PrecioNotFound.category(), ErrorCategory::Notice);
        assert_eq!(ErrorCode::DatabaseError.category(), ErrorCategory::System);
    }

    #[test]
    fn test_category_serde() {
        let json = serde_json::to_string(&ErrorCategory::Payment).unwrap();
        assert_eq!(json, "\"payment\"");

        let category: ErrorCategory = serde_json::from_str("\"route\"").unwrap();
        assert_eq!(category, ErrorCategory::Route);
    }
}
