//! lame_delegation library: lame DNS delegation checks
//!
//! This library checks whether the nameservers a parent zone delegates a zone
//! to actually answer authoritatively for it. A delegated server that does not
//! (a *lame* server) breaks resolution for part of the zone's clients and, if
//! its domain can be registered by anyone, lets a third party take the zone
//! over.
//!
//! # Example
//!
//! ```no_run
//! use lame_delegation::{run_check, Config, Zone};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     zone: Some(Zone::new("example.com")?),
//!     ..Default::default()
//! };
//!
//! let report = run_check(&config).await?;
//! for entry in &report.zones.entries {
//!     println!("{}: {}", entry.zone(), entry.verdict());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

#![warn(missing_docs)]

pub mod config;
mod dns;
mod error_handling;
pub mod export;
pub mod initialization;
pub mod input;
mod lame;

// Re-export public API
pub use config::{Config, FailOn, LogFormat, LogLevel};
pub use dns::{
    classify, DnsTransport, Nameserver, NetworkTransport, QueryClient, QueryMode, QueryResult,
    QueryStatus, RecursiveResolver, ResponseFlags, Zone,
};
pub use error_handling::{InitializationError, QueryError, TransportError, ZoneError};
pub use lame::{
    classify_probe, probe, BulkReport, CheckOptions, CheckReport, CheckSession,
    DelegationResolver, DomainVerdict, LameChecker, NameserverVerdict, ProbeOutcome, ProbeStatus,
    ZoneOutcome,
};
pub use run::{evaluate_exit_code, run_check, run_check_with, RunMode, RunReport};

// Internal run module (wires configuration, input and the checker together)
mod run {
    use anyhow::{bail, Context, Result};
    use log::info;

    use crate::config::{Config, FailOn};
    use crate::dns::QueryClient;
    use crate::initialization::init_query_client;
    use crate::input::read_zones;
    use crate::lame::{BulkReport, CheckOptions, DomainVerdict, LameChecker, ZoneOutcome};

    /// How the zones of a run were given.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub enum RunMode {
        /// One zone from `--zone`; the report is printed as text
        Single,
        /// A zone list from `--file`; the report is exported as CSV
        Bulk,
    }

    /// Results of a check run.
    #[derive(Debug, Clone)]
    pub struct RunReport {
        /// Input mode of the run
        pub mode: RunMode,
        /// One outcome per checked zone, in input order
        pub zones: BulkReport,
    }

    /// Runs a check with the provided configuration.
    ///
    /// This is the main entry point for the library. It resolves the
    /// recursive resolver, then checks either the single configured zone or
    /// every zone listed in the input file.
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - No resolver is configured and the system configuration has none
    /// - The input file cannot be opened
    /// - A single-zone check hits a transport fault
    pub async fn run_check(config: &Config) -> Result<RunReport> {
        let client = init_query_client(config).context("Failed to initialize DNS client")?;
        run_check_with(config, client).await
    }

    /// Like [`run_check`], with a caller-provided [`QueryClient`].
    ///
    /// # Errors
    ///
    /// Same as [`run_check`], minus resolver initialization.
    pub async fn run_check_with(config: &Config, client: QueryClient) -> Result<RunReport> {
        let options = CheckOptions {
            parent_samples: config.parent_samples,
            max_concurrency: config.max_concurrency,
        };
        info!("Using a {}s query timeout", client.timeout().as_secs());
        let checker = LameChecker::new(client, options);

        if let Some(zone) = &config.zone {
            info!("Checking {zone}");
            let report = checker
                .check_zone(zone.clone())
                .await
                .with_context(|| format!("Failed to check {zone}"))?;
            return Ok(RunReport {
                mode: RunMode::Single,
                zones: BulkReport {
                    entries: vec![ZoneOutcome::Checked(report)],
                },
            });
        }

        let Some(file) = &config.file else {
            bail!("No zone or input file given");
        };
        let zones = read_zones(file).await?;
        if zones.is_empty() {
            info!("No zones to check in {}", file.display());
        }
        let report = checker.check_bulk(&zones).await;
        info!("Checked {} zone(s): {}", report.len(), report.summary());

        Ok(RunReport {
            mode: RunMode::Bulk,
            zones: report,
        })
    }

    /// Maps a completed run onto the process exit code under `fail_on`.
    ///
    /// Returns 0 when the policy does not match, 2 when it does. Fatal errors
    /// (exit 1) never reach this function.
    pub fn evaluate_exit_code(fail_on: &FailOn, report: &RunReport) -> i32 {
        let matches = match fail_on {
            FailOn::Never => false,
            FailOn::Lame => report.zones.count(DomainVerdict::Lame) > 0,
            FailOn::AnyIssue => report
                .zones
                .entries
                .iter()
                .any(|entry| entry.verdict() != DomainVerdict::Clean),
        };
        if matches {
            2
        } else {
            0
        }
    }
}
