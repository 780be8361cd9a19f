//! Shared library for the cloud resume handlers
//!
//! This library contains the pieces both handlers need:
//! - Configuration loaded from the environment
//! - The error type and its HTTP mapping
//! - Secret resolution with a process-wide cache
//! - Visitor IP pseudonymization

pub mod config;
pub mod error;
pub mod secrets;
pub mod utils;

// Re-export commonly used types
pub use config::{Config, LogFormat};
pub use error::{AppError, ErrorResponse, Result};
pub use secrets::{CachedSecretResolver, SecretResolver, SsmSecretResolver, StaticSecretResolver};
