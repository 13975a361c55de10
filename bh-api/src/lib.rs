//! Bullhorn API - HTTP client for the Bullhorn CRM REST API.
//!
//! This crate maps method calls onto GET requests against a Bullhorn REST
//! endpoint. Given a session token and REST URL it builds authenticated
//! requests, retries transient failures with exponential backoff, validates
//! response shapes, and returns records trimmed to the requested fields.
//!
//! ```no_run
//! # async fn run() -> bh_core::BhResult<()> {
//! let client = bh_api::ApiClient::from_env()?;
//! let placements = client
//!     .get_placements("dateLastModified:{2023/01/01 TO *}", &["id", "status"])
//!     .await?;
//! println!("{} placement(s)", placements.len());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod credentials;
pub mod endpoints;
pub mod response;
pub mod route;

// Re-export key types
pub use client::{ApiClient, RetryConfig};
pub use credentials::Credentials;
pub use endpoints::search::{EntityType, ListEndpoint, SearchQuery};
pub use response::{parse_fields, Ping, Record, SearchResult};
pub use route::Route;
