//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;

use clap::builder::TypedValueParser;
use clap::{ArgGroup, Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_PARENT_SAMPLES, DEFAULT_PROBE_CONCURRENCY, DNS_PORT, DNS_TIMEOUT_SECS,
};
use crate::dns::Zone;

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Exit code policy.
///
/// Findings are informational by default: the process exits 0 once the report
/// is written, whatever it contains. The other policies let scripts react to
/// findings through exit code 2.
#[derive(Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum FailOn {
    /// Always exit 0 after a completed report
    Never,
    /// Exit 2 when any zone has a lame delegation
    Lame,
    /// Exit 2 when any zone is not clean (lame, indeterminate or failed)
    AnyIssue,
}

/// Library configuration (no CLI dependencies).
///
/// This is the core configuration struct used by the library. It can be
/// constructed programmatically without any CLI dependencies.
///
/// # Examples
///
/// ```no_run
/// use lame_delegation::{Config, Zone};
///
/// let config = Config {
///     zone: Some(Zone::new("example.com").unwrap()),
///     timeout_seconds: 5,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// Single zone to check
    pub zone: Option<Zone>,

    /// File to read zones from (bulk mode, `-` for stdin)
    pub file: Option<PathBuf>,

    /// CSV output path (stdout when absent in bulk mode)
    pub output: Option<PathBuf>,

    /// Log level
    pub log_level: LogLevel,

    /// Log format
    pub log_format: LogFormat,

    /// Per-query timeout in seconds
    pub timeout_seconds: u64,

    /// Recursive resolver to use instead of the system configuration
    pub resolver: Option<SocketAddr>,

    /// Number of parent nameservers asked for the delegation
    pub parent_samples: usize,

    /// Maximum nameserver probes in flight for one zone
    pub max_concurrency: usize,

    /// Exit code policy
    pub fail_on: FailOn,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            zone: None,
            file: None,
            output: None,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
            timeout_seconds: DNS_TIMEOUT_SECS,
            resolver: None,
            parent_samples: DEFAULT_PARENT_SAMPLES,
            max_concurrency: DEFAULT_PROBE_CONCURRENCY,
            fail_on: FailOn::Never,
        }
    }
}

/// Command-line options.
///
/// This struct is automatically generated by `clap` from the field attributes
/// and converts into [`Config`].
///
/// # Examples
///
/// ```bash
/// # Check a single zone
/// lame_delegation --zone example.com
///
/// # Check every zone in a file and write the CSV report to disk
/// lame_delegation --file zones.txt --output results.csv
///
/// # Use a specific recursive resolver and fail the build on lame findings
/// lame_delegation --zone example.com --resolver 9.9.9.9 --fail-on lame
/// ```
#[derive(Debug, Parser)]
#[command(
    name = "lame_delegation",
    about = "Checks DNS zones for lame delegations (Sitting Duck exposure).",
    group(ArgGroup::new("input").required(true).args(["zone", "file"]))
)]
pub struct Opt {
    /// Zone to perform checks against
    #[arg(short, long, value_parser = parse_zone)]
    pub zone: Option<Zone>,

    /// File with one zone per line (use `-` for stdin)
    #[arg(short, long, value_parser)]
    pub file: Option<PathBuf>,

    /// Write the CSV report to this file instead of stdout
    #[arg(short, long, value_parser)]
    pub output: Option<PathBuf>,

    /// Log level: error|warn|info|debug|trace
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format: plain|json
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,

    /// Per-query timeout in seconds
    #[arg(long, default_value_t = DNS_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_seconds: u64,

    /// Recursive resolver (IP or IP:port); defaults to the system configuration
    #[arg(long, value_parser = parse_resolver)]
    pub resolver: Option<SocketAddr>,

    /// Number of parent nameservers asked for the delegation
    ///
    /// Sampling more than one surfaces parents that disagree during a
    /// nameserver migration.
    #[arg(long, default_value_t = DEFAULT_PARENT_SAMPLES, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub parent_samples: usize,

    /// Maximum nameserver probes in flight for one zone
    #[arg(long, default_value_t = DEFAULT_PROBE_CONCURRENCY, value_parser = clap::value_parser!(u64).range(1..).map(|v| v as usize))]
    pub max_concurrency: usize,

    /// Exit code policy: never|lame|any-issue
    #[arg(long, value_enum, default_value_t = FailOn::Never)]
    pub fail_on: FailOn,
}

impl From<Opt> for Config {
    fn from(opt: Opt) -> Self {
        Self {
            zone: opt.zone,
            file: opt.file,
            output: opt.output,
            log_level: opt.log_level,
            log_format: opt.log_format,
            timeout_seconds: opt.timeout_seconds,
            resolver: opt.resolver,
            parent_samples: opt.parent_samples,
            max_concurrency: opt.max_concurrency,
            fail_on: opt.fail_on,
        }
    }
}

/// Parses a `--zone` argument into a normalized [`Zone`].
pub fn parse_zone(value: &str) -> Result<Zone, String> {
    Zone::new(value).map_err(|e| e.to_string())
}

/// Parses a `--resolver` argument: either `IP` (port 53) or `IP:port`.
pub fn parse_resolver(value: &str) -> Result<SocketAddr, String> {
    let value = value.trim();
    if let Ok(addr) = SocketAddr::from_str(value) {
        return Ok(addr);
    }
    IpAddr::from_str(value)
        .map(|ip| SocketAddr::new(ip, DNS_PORT))
        .map_err(|_| format!("'{value}' is not an IP address or IP:port"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.timeout_seconds, 10);
        assert_eq!(config.parent_samples, 1);
        assert_eq!(config.max_concurrency, 1);
        assert_eq!(config.fail_on, FailOn::Never);
        assert!(config.zone.is_none());
        assert!(config.file.is_none());
        assert!(config.resolver.is_none());
    }

    #[test]
    fn test_parse_resolver_ip_only_uses_port_53() {
        let addr = parse_resolver("9.9.9.9").unwrap();
        assert_eq!(addr, "9.9.9.9:53".parse().unwrap());

        let addr = parse_resolver("2620:fe::fe").unwrap();
        assert_eq!(addr.port(), 53);
        assert!(addr.is_ipv6());
    }

    #[test]
    fn test_parse_resolver_with_port() {
        let addr = parse_resolver("127.0.0.1:5353").unwrap();
        assert_eq!(addr.port(), 5353);

        let addr = parse_resolver("[::1]:5353").unwrap();
        assert_eq!(addr.port(), 5353);
    }

    #[test]
    fn test_parse_resolver_rejects_hostnames() {
        assert!(parse_resolver("dns.google").is_err());
        assert!(parse_resolver("").is_err());
    }

    #[test]
    fn test_parse_zone_normalizes() {
        let zone = parse_zone("Example.COM").unwrap();
        assert_eq!(zone.as_str(), "example.com.");
        assert!(parse_zone("bad..zone").is_err());
    }

    #[test]
    fn test_opt_converts_into_config() {
        let opt = Opt::parse_from([
            "lame_delegation",
            "--zone",
            "example.com",
            "--timeout-seconds",
            "3",
            "--fail-on",
            "any-issue",
        ]);
        let config = Config::from(opt);
        assert_eq!(config.zone.unwrap().as_str(), "example.com.");
        assert_eq!(config.timeout_seconds, 3);
        assert_eq!(config.fail_on, FailOn::AnyIssue);
    }
}
