//! Lameness evaluator.
//!
//! Probes one nameserver with an iterative NS query for the zone and decides
//! whether it really serves the zone.

use hickory_proto::rr::RecordType;
use log::debug;

use super::verdict::{NameserverVerdict, ProbeStatus};
use crate::dns::{Nameserver, QueryClient, QueryResult, QueryStatus, Zone};
use crate::error_handling::QueryError;

/// Result of probing one nameserver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOutcome {
    /// Status of the probed nameserver
    pub verdict: NameserverVerdict,
    /// NS set returned by an authoritative answer, sorted. Empty otherwise.
    pub served_ns: Vec<Nameserver>,
}

/// Sends `NS zone` straight to `nameserver` and classifies the reply.
///
/// # Errors
///
/// Returns a [`QueryError`] for unclassified transport faults only.
pub async fn probe(
    client: &QueryClient,
    zone: &Zone,
    nameserver: &Nameserver,
) -> Result<ProbeOutcome, QueryError> {
    let reply = client
        .query_at(zone.as_str(), RecordType::NS, nameserver)
        .await?;
    let outcome = classify_probe(zone, nameserver, &reply);
    debug!(
        "Server check for {zone} at {nameserver}: {} ({})",
        outcome.verdict.status(),
        reply.status
    );
    Ok(outcome)
}

/// Applies the lameness rules, in order:
///
/// 1. TIMEOUT → UNKNOWN/NO RESPONSE
/// 2. any status other than NOERROR → LAME DELEGATION
/// 3. NOERROR with AA → AUTHORITATIVE, keeping the returned NS set
/// 4. NOERROR without AA → LAME DELEGATION (the server only refers or forwards)
pub fn classify_probe(zone: &Zone, nameserver: &Nameserver, reply: &QueryResult) -> ProbeOutcome {
    let mut served_ns = Vec::new();
    let status = match reply.status {
        QueryStatus::Timeout => ProbeStatus::NoResponse,
        QueryStatus::NoError if reply.flags.authoritative => {
            served_ns = reply.answer_nameservers();
            served_ns.sort();
            served_ns.dedup();
            ProbeStatus::Authoritative
        }
        _ => ProbeStatus::LameDelegation,
    };

    ProbeOutcome {
        verdict: NameserverVerdict::new(zone.clone(), nameserver.clone(), status),
        served_ns,
    }
}
