//! Shared types for the Optica backend
//!
//! Error system, domain models and the realtime event payload used by the
//! server and its tests.

pub mod error;
pub mod models;
pub mod realtime;
pub mod util;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
