//! Lame delegation detection.
//!
//! This module provides the check itself:
//! - Delegation discovery from the parent zone
//! - Per-nameserver lameness probes
//! - Reconciliation of the parent's delegation with the authoritative NS set
//! - Domain-level and bulk aggregation
//!
//! A nameserver is lame when the parent delegates the zone to it but it does
//! not answer authoritatively for the zone. Such a server is a takeover risk
//! if its domain can be registered by someone else.

mod checker;
mod delegation;
mod evaluator;
mod session;
mod verdict;

// Re-export public API
pub use checker::{BulkReport, CheckOptions, LameChecker, ZoneOutcome};
pub use delegation::DelegationResolver;
pub use evaluator::{classify_probe, probe, ProbeOutcome};
pub use session::{CheckReport, CheckSession};
pub use verdict::{DomainVerdict, NameserverVerdict, ProbeStatus};
