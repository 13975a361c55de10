//! API endpoint modules organized by category.
//!
//! Each module adds typed methods to `ApiClient` for a group of related
//! REST endpoints.

pub mod search;
pub mod entity;
pub mod session;
