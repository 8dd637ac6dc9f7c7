//! Unified service-layer error type
//!
//! `ServiceError` bridges DB-layer errors (`sqlx::Error`, `BoxError`) and the
//! API-layer error (`AppError`), so data-access functions can mix SQL calls
//! and business-rule checks behind a single `?`.

use axum::response::IntoResponse;
use shared::error::{AppError, ErrorCode};

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Service-layer error
///
/// - `Db`: Database/infrastructure errors (logged, mapped to InternalError)
/// - `App`: Business-rule errors (passed through to the client)
#[derive(Debug)]
pub enum ServiceError {
    Db(BoxError),
    App(AppError),
}

impl ServiceError {
    /// Map a unique-key violation to `code`; anything else stays a DB error
    pub fn unique_or_db(e: sqlx::Error, code: ErrorCode) -> Self {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(code))
        } else {
            ServiceError::Db(e.into())
        }
    }

    /// Map a foreign-key violation to `code`; anything else stays a DB error
    pub fn foreign_key_or_db(e: sqlx::Error, code: ErrorCode) -> Self {
        if is_foreign_key_violation(&e) {
            ServiceError::App(AppError::new(code))
        } else {
            ServiceError::Db(e.into())
        }
    }

    /// Map both unique and foreign-key violations
    pub fn constraint(e: sqlx::Error, on_unique: ErrorCode, on_foreign_key: ErrorCode) -> Self {
        if is_unique_violation(&e) {
            ServiceError::App(AppError::new(on_unique))
        } else {
            Self::foreign_key_or_db(e, on_foreign_key)
        }
    }
}

fn is_unique_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
}

fn is_foreign_key_violation(e: &sqlx::Error) -> bool {
    e.as_database_error()
        .is_some_and(|db| db.is_foreign_key_violation())
}

impl From<sqlx::Error> for ServiceError {
    fn from(e: sqlx::Error) -> Self {
        ServiceError::Db(e.into())
    }
}

impl From<BoxError> for ServiceError {
    fn from(e: BoxError) -> Self {
        ServiceError::Db(e)
    }
}

impl From<AppError> for ServiceError {
    fn from(e: AppError) -> Self {
        ServiceError::App(e)
    }
}

impl From<ServiceError> for AppError {
    fn from(e: ServiceError) -> Self {
        match e {
            ServiceError::App(app_err) => app_err,
            ServiceError::Db(db_err) => {
                tracing::error!(error = %db_err, "Service database error");
                AppError::new(ErrorCode::InternalError)
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> axum::response::Response {
        let app_error: AppError = self.into();
        app_error.into_response()
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn business_errors_pass_through() {
        let err: AppError = ServiceError::App(AppError::new(ErrorCode::RutaUnreconciled)).into();
        assert_eq!(err.code, ErrorCode::RutaUnreconciled);
    }

    #[test]
    fn db_errors_become_internal() {
        let err: AppError = ServiceError::from(sqlx::Error::RowNotFound).into();
        assert_eq!(err.code, ErrorCode::InternalError);
        assert_eq!(err.http_status(), http::StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn non_constraint_errors_stay_db() {
        let err = ServiceError::unique_or_db(sqlx::Error::PoolTimedOut, ErrorCode::FolioExists);
        assert!(matches!(err, ServiceError::Db(_)));
    }
}
