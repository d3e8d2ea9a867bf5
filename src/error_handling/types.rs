//! Error type definitions.
//!
//! This module defines the error types used throughout the application. DNS
//! outcomes such as NXDOMAIN or a timeout are not errors here: they are
//! classified into [`crate::dns::QueryStatus`]. Only faults that mean the tool
//! itself could not do its job end up in these enums.

use std::net::SocketAddr;

use hickory_proto::error::ProtoError;
use hickory_resolver::error::ResolveError;
use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// No usable recursive resolver configuration was found.
    #[error("DNS resolver configuration error: {0}")]
    ResolverConfigError(String),
}

/// Failures of a single DNS exchange with one server.
#[derive(Error, Debug)]
pub enum TransportError {
    /// No response arrived before the per-query timeout.
    #[error("query to {0} timed out")]
    Timeout(SocketAddr),

    /// Socket-level failure (bind, send, receive, connect).
    #[error("socket error talking to {server}: {source}")]
    Io {
        /// Server being queried
        server: SocketAddr,
        /// Underlying socket error
        #[source]
        source: std::io::Error,
    },

    /// The server answered with bytes that do not decode as a DNS message.
    #[error("malformed DNS message from {server}: {source}")]
    Protocol {
        /// Server being queried
        server: SocketAddr,
        /// Decode error
        #[source]
        source: ProtoError,
    },
}

/// Unclassified query failures.
///
/// These are fatal for the zone being checked: they are never downgraded to a
/// lame verdict, since they say nothing about the target's delegation.
#[derive(Error, Debug)]
pub enum QueryError {
    /// The query message could not be built (e.g. an unencodable name).
    #[error("failed to encode query for '{name}': {source}")]
    Encode {
        /// Name that failed to encode
        name: String,
        /// Encode error
        #[source]
        source: ProtoError,
    },

    /// Transport failure other than a timeout.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The recursive resolver failed without a response code or a timeout.
    #[error("recursive lookup of '{name}' failed: {source}")]
    Resolve {
        /// Name being resolved
        name: String,
        /// Resolver error
        #[source]
        source: ResolveError,
    },
}

/// Rejected zone or nameserver names.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ZoneError {
    /// Nothing but whitespace.
    #[error("zone name is empty")]
    Empty,

    /// Two consecutive dots, or a leading dot.
    #[error("'{0}' contains an empty label")]
    EmptyLabel(String),

    /// A label exceeds 63 octets.
    #[error("label '{label}' in '{name}' is longer than 63 octets")]
    LabelTooLong {
        /// Full name as given
        name: String,
        /// Offending label
        label: String,
    },

    /// The whole name exceeds 253 octets.
    #[error("'{0}' is longer than 253 octets")]
    NameTooLong(String),

    /// Anything but letters, digits, `-`, `_` or `*`.
    #[error("'{0}' contains characters not allowed in a DNS name")]
    InvalidCharacter(String),
}
