//! # Axum Helpers
//!
//! A collection of utilities and helpers shared by Axum services in this
//! workspace.
//!
//! ## Modules
//!
//! - **[`errors`]**: Structured error responses and fallback handlers
//! - **[`extractors`]**: Custom extractors (validated JSON, bearer identity)
//! - **[`server`]**: Server bootstrap with graceful shutdown

pub mod errors;
pub mod extractors;
pub mod server;

pub use errors::{AppError, ErrorResponse};
pub use extractors::{CallerIdentity, ValidatedJson};
pub use server::{create_app, shutdown_signal};
