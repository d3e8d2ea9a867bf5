//! Per-nameserver and per-domain verdicts.

use std::fmt;

use serde::Serialize;
use strum_macros::EnumIter as EnumIterMacro;

use crate::config::{STATUS_AUTHORITATIVE, STATUS_LAME_DELEGATION, STATUS_NO_RESPONSE};
use crate::dns::{Nameserver, Zone};

/// How one nameserver answered for the zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ProbeStatus {
    /// NOERROR with the Authoritative-Answer flag set.
    #[serde(rename = "AUTHORITATIVE")]
    Authoritative,
    /// Any error rcode, or NOERROR without the AA flag.
    #[serde(rename = "LAME DELEGATION")]
    LameDelegation,
    /// No response within the query timeout.
    #[serde(rename = "UNKNOWN/NO RESPONSE")]
    NoResponse,
}

impl ProbeStatus {
    /// Report label.
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeStatus::Authoritative => STATUS_AUTHORITATIVE,
            ProbeStatus::LameDelegation => STATUS_LAME_DELEGATION,
            ProbeStatus::NoResponse => STATUS_NO_RESPONSE,
        }
    }
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verdict for one probed nameserver. Immutable once produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameserverVerdict {
    zone: Zone,
    nameserver: Nameserver,
    status: ProbeStatus,
}

impl NameserverVerdict {
    /// Records `status` for `nameserver` in `zone`.
    pub fn new(zone: Zone, nameserver: Nameserver, status: ProbeStatus) -> Self {
        Self {
            zone,
            nameserver,
            status,
        }
    }

    /// Zone the probe was for.
    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Probed nameserver.
    pub fn nameserver(&self) -> &Nameserver {
        &self.nameserver
    }

    /// Probe result.
    pub fn status(&self) -> ProbeStatus {
        self.status
    }
}

/// Aggregate verdict for a zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum DomainVerdict {
    /// Every probed nameserver answered authoritatively.
    Clean,
    /// At least one nameserver is a lame delegation.
    Lame,
    /// No lame delegation, but at least one nameserver did not respond.
    Indeterminate,
    /// No nameserver could be checked at all.
    Failed,
}

impl DomainVerdict {
    /// Aggregates per-nameserver verdicts. LAME wins over INDETERMINATE; an
    /// empty list is FAILED, never CLEAN.
    pub fn from_verdicts(verdicts: &[NameserverVerdict]) -> Self {
        if verdicts.is_empty() {
            return DomainVerdict::Failed;
        }
        if verdicts
            .iter()
            .any(|v| v.status() == ProbeStatus::LameDelegation)
        {
            DomainVerdict::Lame
        } else if verdicts.iter().any(|v| v.status() == ProbeStatus::NoResponse) {
            DomainVerdict::Indeterminate
        } else {
            DomainVerdict::Clean
        }
    }

    /// Report label.
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainVerdict::Clean => "CLEAN",
            DomainVerdict::Lame => "LAME",
            DomainVerdict::Indeterminate => "INDETERMINATE",
            DomainVerdict::Failed => "FAILED",
        }
    }
}

impl fmt::Display for DomainVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
