//! Per-zone working state of a lame delegation check.
//!
//! A [`CheckSession`] belongs to exactly one zone. Each phase of the check
//! takes the session by value and hands it back, so there is no shared object
//! whose fields could carry one zone's findings into the next check.

use std::collections::BTreeSet;

use super::evaluator::ProbeOutcome;
use super::verdict::{DomainVerdict, NameserverVerdict};
use crate::dns::{Nameserver, Zone};

/// Working state of one zone's check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSession {
    zone: Zone,
    ns_from_parent: BTreeSet<Nameserver>,
    auth_ns: BTreeSet<Nameserver>,
    results: Vec<NameserverVerdict>,
}

impl CheckSession {
    /// Starts an empty session for `zone`.
    pub fn new(zone: Zone) -> Self {
        Self {
            zone,
            ns_from_parent: BTreeSet::new(),
            auth_ns: BTreeSet::new(),
            results: Vec::new(),
        }
    }

    /// Consumes this session and starts an empty one for `zone`.
    pub fn reset(self, zone: Zone) -> Self {
        Self::new(zone)
    }

    /// Seeds the delegation instead of discovering it from the parent.
    pub fn with_delegation<I>(self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = Nameserver>,
    {
        self.merge_parent_delegation(nameservers)
    }

    /// The zone under check.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Nameservers the parent delegates to.
    pub fn ns_from_parent(&self) -> &BTreeSet<Nameserver> {
        &self.ns_from_parent
    }

    /// Nameservers named in the NS answers of authoritative responses.
    pub fn auth_ns(&self) -> &BTreeSet<Nameserver> {
        &self.auth_ns
    }

    /// Verdicts in probe order.
    pub fn results(&self) -> &[NameserverVerdict] {
        &self.results
    }

    /// Aggregate of [`CheckSession::results`].
    pub fn verdict(&self) -> DomainVerdict {
        DomainVerdict::from_verdicts(&self.results)
    }

    pub(crate) fn merge_parent_delegation<I>(mut self, nameservers: I) -> Self
    where
        I: IntoIterator<Item = Nameserver>,
    {
        self.ns_from_parent.extend(nameservers);
        self
    }

    /// Drops earlier verdicts and the NS set they reported before a fresh
    /// pass over the nameservers. The delegation is kept.
    pub(crate) fn clear_results(mut self) -> Self {
        self.results.clear();
        self.auth_ns.clear();
        self
    }

    /// Records a probe: its verdict and, for authoritative servers, the NS set
    /// they served.
    pub(crate) fn absorb(mut self, outcome: ProbeOutcome) -> Self {
        self.auth_ns.extend(outcome.served_ns);
        self.results.push(outcome.verdict);
        self
    }

    /// Nameservers known to only one side: delegated by the parent but never
    /// named by an authoritative server, or named by one but not delegated.
    pub fn drift(&self) -> BTreeSet<Nameserver> {
        self.ns_from_parent
            .symmetric_difference(&self.auth_ns)
            .cloned()
            .collect()
    }

    /// Drifted nameservers that have no verdict yet.
    ///
    /// Empty while `auth_ns` is empty or equal to the delegation.
    pub(crate) fn unprobed_drift(&self) -> Vec<Nameserver> {
        if self.auth_ns.is_empty() || self.auth_ns == self.ns_from_parent {
            return Vec::new();
        }
        let probed: BTreeSet<&Nameserver> =
            self.results.iter().map(NameserverVerdict::nameserver).collect();
        self.drift()
            .into_iter()
            .filter(|ns| !probed.contains(ns))
            .collect()
    }

    /// Snapshot of the session for reporting.
    pub fn to_report(&self) -> CheckReport {
        CheckReport {
            zone: self.zone.clone(),
            verdict: self.verdict(),
            results: self.results.clone(),
            ns_from_parent: self.ns_from_parent.clone(),
            auth_ns: self.auth_ns.clone(),
        }
    }

    /// Consumes the session into its report.
    pub fn into_report(self) -> CheckReport {
        CheckReport {
            verdict: self.verdict(),
            zone: self.zone,
            results: self.results,
            ns_from_parent: self.ns_from_parent,
            auth_ns: self.auth_ns,
        }
    }
}

/// Finished check of one zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckReport {
    /// Checked zone
    pub zone: Zone,
    /// Aggregate verdict
    pub verdict: DomainVerdict,
    /// Per-nameserver verdicts in probe order
    pub results: Vec<NameserverVerdict>,
    /// Delegation found at the parent
    pub ns_from_parent: BTreeSet<Nameserver>,
    /// NS set served by authoritative answers
    pub auth_ns: BTreeSet<Nameserver>,
}

impl CheckReport {
    /// Delegated by the parent, never named by an authoritative server.
    ///
    /// Empty when no server answered authoritatively, since there is nothing
    /// to compare against.
    pub fn parent_only(&self) -> Vec<&Nameserver> {
        if self.auth_ns.is_empty() {
            return Vec::new();
        }
        self.ns_from_parent.difference(&self.auth_ns).collect()
    }

    /// Named by an authoritative server, not delegated by the parent.
    pub fn authoritative_only(&self) -> Vec<&Nameserver> {
        if self.auth_ns.is_empty() {
            return Vec::new();
        }
        self.auth_ns.difference(&self.ns_from_parent).collect()
    }
}
