//! Delegation resolver.
//!
//! Finds the nameservers a zone's parent delegates to: resolve the parent's
//! NS set, then ask one (or more) of the parent's servers for the child's NS
//! records. The parent is not authoritative for the child, so the delegation
//! normally arrives as a referral in the authority section.

use std::collections::BTreeSet;

use hickory_proto::rr::RecordType;
use log::{debug, warn};

use super::session::CheckSession;
use crate::dns::{Nameserver, QueryClient, QueryResult, Zone};
use crate::error_handling::QueryError;

/// Discovers a zone's delegation by asking its parent's nameservers.
pub struct DelegationResolver<'a> {
    client: &'a QueryClient,
    parent_samples: usize,
}

impl<'a> DelegationResolver<'a> {
    /// Creates a resolver.
    ///
    /// # Arguments
    ///
    /// * `client` - Query classifier
    /// * `parent_samples` - How many parent nameservers must yield a
    ///   delegation; their sets are merged (at least 1)
    pub fn new(client: &'a QueryClient, parent_samples: usize) -> Self {
        Self {
            client,
            parent_samples: parent_samples.max(1),
        }
    }

    /// Discovers the delegation and merges it into `ns_from_parent`.
    pub async fn resolve(&self, session: CheckSession) -> Result<CheckSession, QueryError> {
        let delegated = self.discover(session.zone()).await?;
        if delegated.is_empty() {
            warn!("No delegation found for {}", session.zone());
        }
        Ok(session.merge_parent_delegation(delegated))
    }

    /// Discovers the delegated nameserver set of `zone`.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for unclassified transport faults only.
    pub async fn discover(&self, zone: &Zone) -> Result<BTreeSet<Nameserver>, QueryError> {
        let parent = zone.parent();

        debug!("Performing query for parent domain: {parent}");
        let parent_reply = self.client.resolve(parent.as_str(), RecordType::NS).await?;
        let parent_ns: BTreeSet<Nameserver> = if parent_reply.is_success() {
            parent_reply.answer_nameservers().into_iter().collect()
        } else {
            BTreeSet::new()
        };

        if parent_ns.is_empty() {
            warn!(
                "No parent NS records found for {parent} ({}), attempting recursion for {zone}",
                parent_reply.status
            );
            let reply = self.client.resolve(zone.as_str(), RecordType::NS).await?;
            return Ok(delegation_from(&reply));
        }
        debug!("Parent NS records for {parent}: {parent_ns:?}");

        let mut delegated = BTreeSet::new();
        let mut first_answer: Option<BTreeSet<Nameserver>> = None;
        let mut sampled = 0;
        for server in &parent_ns {
            if sampled >= self.parent_samples {
                break;
            }
            debug!("Querying {server} for delegation authority of {zone}");
            let reply = self
                .client
                .query_at(zone.as_str(), RecordType::NS, server)
                .await?;
            let found = delegation_from(&reply);
            if found.is_empty() {
                debug!("{server} returned no delegation for {zone} ({})", reply.status);
                continue;
            }
            sampled += 1;

            match &first_answer {
                None => first_answer = Some(found.clone()),
                Some(first) if *first != found => warn!(
                    "Parent nameservers disagree on the delegation of {zone}: {server} returned {found:?}, expected {first:?}"
                ),
                Some(_) => {}
            }
            delegated.extend(found);
        }

        Ok(delegated)
    }
}

/// The NS set carried by a reply: answer records when the server was itself
/// authoritative for the zone, otherwise the referral's authority section.
fn delegation_from(reply: &QueryResult) -> BTreeSet<Nameserver> {
    if !reply.is_success() {
        return BTreeSet::new();
    }
    let answers = reply.answer_nameservers();
    if !answers.is_empty() {
        debug!("Using answer section");
        answers.into_iter().collect()
    } else {
        debug!("Using authority section");
        reply.authority_records.iter().cloned().collect()
    }
}
