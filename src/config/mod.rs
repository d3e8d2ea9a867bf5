//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, ports, report labels)
//! - CLI option types and parsing

mod constants;
mod types;

// Re-export all constants
pub use constants::*;
pub use types::{parse_resolver, parse_zone, Config, FailOn, LogFormat, LogLevel, Opt};
