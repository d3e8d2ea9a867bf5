//! Query classifier.
//!
//! [`QueryClient`] is the only way the rest of the crate talks DNS. Direct
//! queries go through a [`DnsTransport`], full resolution through a
//! [`RecursiveResolver`]. Every outcome maps onto a [`QueryResult`]:
//!
//! | transport outcome                        | status                    |
//! |------------------------------------------|---------------------------|
//! | response, rcode NOERROR                  | `NOERROR` + records       |
//! | NOERROR, no answer, full resolution      | `NOANSWER`                |
//! | rcode NXDOMAIN / YXDOMAIN                | `NXDOMAIN` / `YXDOMAIN`   |
//! | any other rcode                          | raw code (`SERVFAIL`, ..) |
//! | deadline expired                         | `TIMEOUT`                 |
//! | socket or decode failure                 | `Err(QueryError)` (fatal) |

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use hickory_proto::op::Message;
use hickory_proto::rr::RecordType;
use log::debug;

use super::message::{answer_strings, authority_nameservers, build_query};
use super::query::{QueryResult, QueryStatus, ResponseFlags};
use super::recursive::RecursiveResolver;
use super::transport::DnsTransport;
use super::zone::Nameserver;
use crate::config::DNS_PORT;
use crate::error_handling::{QueryError, TransportError};

/// How a query is sent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryMode {
    /// Recursion desired, answered by a recursive resolver.
    Recursive,
    /// Recursion not desired, sent straight to a nameserver.
    Direct,
}

/// Where a nameserver can be reached, or why it cannot.
enum NameserverAddress {
    Resolved(SocketAddr),
    Unresolved(QueryStatus),
}

/// Sends DNS queries and classifies their outcomes.
#[derive(Clone)]
pub struct QueryClient {
    transport: Arc<dyn DnsTransport>,
    resolver: Arc<dyn RecursiveResolver>,
    timeout: Duration,
}

impl QueryClient {
    /// # Arguments
    ///
    /// * `transport` - Message exchange with the nameservers under test
    /// * `resolver` - Recursive resolver used for full resolution
    /// * `timeout` - Deadline applied to every direct query
    pub fn new(
        transport: Arc<dyn DnsTransport>,
        resolver: Arc<dyn RecursiveResolver>,
        timeout: Duration,
    ) -> Self {
        Self {
            transport,
            resolver,
            timeout,
        }
    }

    /// Per-query deadline.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Queries `name` for `rdtype`, through the resolver when `nameserver` is
    /// `None`, or directly at `nameserver` otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] only for unclassified faults; DNS-level
    /// failures are reported through [`QueryResult::status`].
    pub async fn query(
        &self,
        name: &str,
        rdtype: RecordType,
        nameserver: Option<&Nameserver>,
    ) -> Result<QueryResult, QueryError> {
        match nameserver {
            Some(nameserver) => self.query_at(name, rdtype, nameserver).await,
            None => self.resolve(name, rdtype).await,
        }
    }

    /// Full resolution through the recursive resolver.
    pub async fn resolve(&self, name: &str, rdtype: RecordType) -> Result<QueryResult, QueryError> {
        let result = self.resolver.resolve(name, rdtype).await?;
        debug!("Resolved {name} {rdtype}: {result}");
        Ok(result)
    }

    /// Iterative query sent straight to `nameserver`.
    ///
    /// Hostname nameservers are resolved with a recursive `A` lookup first.
    /// When that lookup produces no address its status (NXDOMAIN, TIMEOUT, ...)
    /// is returned as the status of this query.
    pub async fn query_at(
        &self,
        name: &str,
        rdtype: RecordType,
        nameserver: &Nameserver,
    ) -> Result<QueryResult, QueryError> {
        let server = match self.locate(nameserver).await? {
            NameserverAddress::Resolved(server) => server,
            NameserverAddress::Unresolved(status) => {
                debug!("Nameserver {nameserver} has no usable address ({status})");
                return Ok(QueryResult::status_only(status, rdtype));
            }
        };

        let request = build_query(name, rdtype, false)?;
        let outcome = self.transport.exchange(&request, server, self.timeout).await;
        let result = classify(rdtype, QueryMode::Direct, outcome)?;
        debug!("Queried {name} {rdtype} at {nameserver} ({server}): {result}");
        Ok(result)
    }

    async fn locate(&self, nameserver: &Nameserver) -> Result<NameserverAddress, QueryError> {
        if let Some(ip) = nameserver.ip() {
            return Ok(NameserverAddress::Resolved(SocketAddr::new(ip, DNS_PORT)));
        }

        let lookup = self.resolve(nameserver.as_str(), RecordType::A).await?;
        if !lookup.is_success() {
            return Ok(NameserverAddress::Unresolved(lookup.status));
        }
        Ok(lookup
            .answer_records
            .iter()
            .find_map(|record| record.parse::<IpAddr>().ok())
            .map(|ip| NameserverAddress::Resolved(SocketAddr::new(ip, DNS_PORT)))
            .unwrap_or(NameserverAddress::Unresolved(QueryStatus::NoAnswer)))
    }
}

/// Maps a transport outcome onto a [`QueryResult`].
///
/// Only timeouts are absorbed from the error side; every other transport
/// failure is returned as a fatal [`QueryError`].
pub fn classify(
    rdtype: RecordType,
    mode: QueryMode,
    outcome: Result<Message, TransportError>,
) -> Result<QueryResult, QueryError> {
    let message = match outcome {
        Ok(message) => message,
        Err(TransportError::Timeout(server)) => {
            debug!("Query for {rdtype} to {server} timed out");
            return Ok(QueryResult::status_only(QueryStatus::Timeout, rdtype));
        }
        Err(e) => return Err(e.into()),
    };

    let mut status = QueryStatus::from_rcode(message.response_code());
    let answer_records = if status == QueryStatus::NoError {
        answer_strings(&message, rdtype)
    } else {
        Vec::new()
    };
    // Direct queries keep NOERROR so referrals stay visible to callers.
    if status == QueryStatus::NoError && answer_records.is_empty() && mode == QueryMode::Recursive
    {
        status = QueryStatus::NoAnswer;
    }

    Ok(QueryResult {
        status,
        rdtype,
        answer_records,
        authority_records: authority_nameservers(&message),
        flags: ResponseFlags::from(message.header()),
    })
}
