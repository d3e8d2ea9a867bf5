//! Error handling.
//!
//! This module provides the error types for initialization, DNS transport,
//! query and name validation failures.
//!
//! Errors are split by how far they reach:
//! - **Initialization**: fatal before any query is sent
//! - **Query/Transport**: fatal for the zone currently being checked
//! - **Zone**: invalid input names, skipped or rejected at the CLI

mod types;

// Re-export public API
pub use types::{InitializationError, QueryError, TransportError, ZoneError};
