//! Configuration constants.
//!
//! This module defines the constants used throughout the application,
//! including DNS timeouts, ports, and wire-size limits.

// Network operation timeouts
/// DNS query timeout in seconds.
/// Applied to every individual query; a query that exceeds it is classified
/// as TIMEOUT and is never retried within the same check.
pub const DNS_TIMEOUT_SECS: u64 = 10;

/// Port used for every DNS exchange unless a resolver override says otherwise.
pub const DNS_PORT: u16 = 53;

// Wire limits
/// Receive buffer for UDP responses (EDNS-sized).
pub const MAX_UDP_RESPONSE_SIZE: usize = 4096;
/// Longest presentation-format name accepted, excluding the final dot.
pub const MAX_NAME_LENGTH: usize = 253;
/// Longest single label accepted.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Default number of parent nameservers sampled for the delegation.
pub const DEFAULT_PARENT_SAMPLES: usize = 1;

/// Default number of nameserver probes in flight for one zone (sequential).
pub const DEFAULT_PROBE_CONCURRENCY: usize = 1;

/// Report label of an authoritative nameserver.
pub const STATUS_AUTHORITATIVE: &str = "AUTHORITATIVE";
/// Report label of a lame nameserver.
pub const STATUS_LAME_DELEGATION: &str = "LAME DELEGATION";
/// Report label of a nameserver that never answered.
pub const STATUS_NO_RESPONSE: &str = "UNKNOWN/NO RESPONSE";

/// Header of the bulk CSV report.
pub const CSV_HEADER: [&str; 3] = ["zone", "nameserver", "status"];
