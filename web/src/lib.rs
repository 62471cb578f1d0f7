//! Axum web framework integration for devconnect.
//!
//! This crate bridges domain errors and HTTP, implementing the
//! "Functional Core, Imperative Shell" split:
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │         Imperative Shell (Axum)         │  ← HTTP, JSON, headers
//! │  - Request parsing                      │  ← Correlation IDs, logging
//! │  - Response serialization               │
//! ├─────────────────────────────────────────┤
//! │         Functional Core                 │
//! │  - Handlers validate and authorize      │  ← Testable at memory speed
//! │  - Repository traits own persistence    │  ← No HTTP types below here
//! └─────────────────────────────────────────┘
//! ```

pub mod error;
pub mod extractors;
pub mod middleware;

// Re-export key types for convenience
pub use error::{AppError, FieldError};
pub use extractors::CorrelationId;
pub use middleware::{correlation_id_layer, CORRELATION_ID_HEADER};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
