//! Reconciliation engine.
//!
//! Runs the full check for a zone: discover the delegation, probe every
//! delegated nameserver, then probe the nameservers that only one side knows
//! about (delegated but never named authoritatively, or named by an
//! authoritative server but not delegated). Bulk mode repeats this per zone.

use futures::stream::{self, StreamExt, TryStreamExt};
use log::{debug, error, info};
use strum::IntoEnumIterator;

use super::delegation::DelegationResolver;
use super::evaluator::{probe, ProbeOutcome};
use super::session::{CheckReport, CheckSession};
use super::verdict::DomainVerdict;
use crate::config::{DEFAULT_PARENT_SAMPLES, DEFAULT_PROBE_CONCURRENCY};
use crate::dns::{Nameserver, QueryClient, Zone};
use crate::error_handling::QueryError;

/// Tuning knobs of a check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Parent nameservers asked for the delegation.
    pub parent_samples: usize,
    /// Probes in flight for one zone; 1 keeps the check sequential.
    pub max_concurrency: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            parent_samples: DEFAULT_PARENT_SAMPLES,
            max_concurrency: DEFAULT_PROBE_CONCURRENCY,
        }
    }
}

/// Outcome of one zone in a bulk run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ZoneOutcome {
    /// The check completed.
    Checked(CheckReport),
    /// The check hit an unclassified fault; the run moved on.
    Errored {
        /// Zone being checked
        zone: Zone,
        /// Rendered fault
        error: String,
    },
}

impl ZoneOutcome {
    /// Zone this outcome belongs to.
    pub fn zone(&self) -> &Zone {
        match self {
            ZoneOutcome::Checked(report) => &report.zone,
            ZoneOutcome::Errored { zone, .. } => zone,
        }
    }

    /// Domain verdict; an errored check counts as [`DomainVerdict::Failed`].
    pub fn verdict(&self) -> DomainVerdict {
        match self {
            ZoneOutcome::Checked(report) => report.verdict,
            ZoneOutcome::Errored { .. } => DomainVerdict::Failed,
        }
    }
}

/// Per-zone outcomes of a run, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkReport {
    /// One outcome per zone
    pub entries: Vec<ZoneOutcome>,
}

impl BulkReport {
    /// Number of zones with `verdict`.
    pub fn count(&self, verdict: DomainVerdict) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.verdict() == verdict)
            .count()
    }

    /// Per-verdict counts in verdict order, e.g. `2 clean, 1 lame, 0
    /// indeterminate, 0 failed`.
    pub fn summary(&self) -> String {
        DomainVerdict::iter()
            .map(|verdict| {
                format!(
                    "{} {}",
                    self.count(verdict),
                    verdict.as_str().to_ascii_lowercase()
                )
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Number of zones.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when no zone was checked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs lame delegation checks with one [`QueryClient`].
pub struct LameChecker {
    client: QueryClient,
    options: CheckOptions,
}

impl LameChecker {
    /// Creates a checker.
    pub fn new(client: QueryClient, options: CheckOptions) -> Self {
        Self { client, options }
    }

    /// The client all queries go through.
    pub fn client(&self) -> &QueryClient {
        &self.client
    }

    /// Runs the check on `session` and returns it with `results` set.
    ///
    /// A session that already carries a delegation skips discovery.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] when a query hits an unclassified fault.
    pub async fn full_check(&self, session: CheckSession) -> Result<CheckSession, QueryError> {
        let mut session = session.clear_results();
        if session.ns_from_parent().is_empty() {
            session = DelegationResolver::new(&self.client, self.options.parent_samples)
                .resolve(session)
                .await?;
        }

        let zone = session.zone().clone();
        let delegated: Vec<Nameserver> = session.ns_from_parent().iter().cloned().collect();
        for outcome in self.probe_all(&zone, &delegated).await? {
            session = session.absorb(outcome);
        }

        // Newly probed servers may name further servers; repeat until every
        // drifted nameserver has a verdict.
        loop {
            let drift = session.unprobed_drift();
            if drift.is_empty() {
                break;
            }
            info!(
                "Delegation of {zone} differs from authoritative NS set, checking {} more nameserver(s)",
                drift.len()
            );
            for outcome in self.probe_all(&zone, &drift).await? {
                session = session.absorb(outcome);
            }
        }

        debug!("Check of {zone} finished: {}", session.verdict());
        Ok(session)
    }

    /// Checks one zone from scratch.
    pub async fn check_zone(&self, zone: Zone) -> Result<CheckReport, QueryError> {
        self.full_check(CheckSession::new(zone))
            .await
            .map(CheckSession::into_report)
    }

    /// Checks zones one after another, each with a reset session.
    ///
    /// A fault in one zone is logged and recorded as
    /// [`ZoneOutcome::Errored`]; the remaining zones are still checked.
    pub async fn check_bulk(&self, zones: &[Zone]) -> BulkReport {
        let mut entries = Vec::with_capacity(zones.len());
        let mut carried: Option<CheckSession> = None;

        for zone in zones {
            let session = match carried.take() {
                Some(previous) => previous.reset(zone.clone()),
                None => CheckSession::new(zone.clone()),
            };
            info!("Checking {zone}");
            match self.full_check(session).await {
                Ok(checked) => {
                    entries.push(ZoneOutcome::Checked(checked.to_report()));
                    carried = Some(checked);
                }
                Err(e) => {
                    error!("Check of {zone} failed: {e}");
                    entries.push(ZoneOutcome::Errored {
                        zone: zone.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        BulkReport { entries }
    }

    /// Probes `nameservers` with at most `max_concurrency` in flight; outcomes
    /// come back in input order.
    async fn probe_all(
        &self,
        zone: &Zone,
        nameservers: &[Nameserver],
    ) -> Result<Vec<ProbeOutcome>, QueryError> {
        stream::iter(nameservers)
            .map(|nameserver| probe(&self.client, zone, nameserver))
            .buffered(self.options.max_concurrency.max(1))
            .try_collect()
            .await
    }
}
