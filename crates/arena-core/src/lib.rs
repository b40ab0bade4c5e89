//! Arena Core Library
//!
//! Domain models, the error taxonomy, configuration and API-key helpers shared by
//! the API server, the stores and the CLI.

pub mod api_key;
pub mod config;
pub mod error;
pub mod models;
pub mod store_backend;

// Re-export commonly used types
pub use config::{BaseConfig, Config};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use store_backend::StoreBackend;
