//! Bullhorn Core - Foundation types, error handling, configuration, and logging.
//!
//! This crate provides the shared foundation used by the other Bullhorn crates:
//! - Client configuration (REST URL, session token, retry and timeout settings)
//! - The error taxonomy surfaced by every API call
//! - Structured logging with tracing
//! - Per-user directories and host description
//! - Common constants

pub mod config;
pub mod error;
pub mod logging;
pub mod platform;
pub mod constants;

// Re-export commonly used items at the crate root
pub use config::AppConfig;
pub use error::{BhError, BhResult};
pub use logging::init_logging;
