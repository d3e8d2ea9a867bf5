//! DNS names, queries and transport.
//!
//! This module provides the protocol layer of the lame delegation check:
//! - Zone and nameserver names with DNS normalization
//! - Query message construction and typed record extraction (`hickory-proto`)
//! - UDP transport with TCP fallback on truncation
//! - Full resolution through `hickory-resolver`
//! - The query classifier that turns every outcome into a [`QueryResult`]
//!
//! Full resolution goes to the configured recursive resolvers; iterative
//! queries go straight to the nameserver under test.

mod client;
mod message;
mod query;
mod recursive;
mod transport;
mod zone;

// Re-export public API
pub use client::{classify, QueryClient, QueryMode};
pub use query::{QueryResult, QueryStatus, ResponseFlags};
pub use recursive::RecursiveResolver;
pub use transport::{DnsTransport, NetworkTransport};
pub use zone::{Nameserver, Zone};

#[cfg(test)]
pub(crate) mod testing;
