//! Full resolution through recursive resolvers.
//!
//! Production runs hand this to a `hickory-resolver` [`TokioAsyncResolver`]
//! built from the system configuration, which fails over between the
//! configured nameservers. Lookup errors are folded into the same
//! [`QueryStatus`] values the direct path produces.

use async_trait::async_trait;
use hickory_proto::error::ProtoErrorKind;
use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Record, RecordType};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::lookup::Lookup;
use hickory_resolver::TokioAsyncResolver;

use super::message::render_rdata;
use super::query::{QueryResult, QueryStatus, ResponseFlags};
use crate::error_handling::QueryError;

/// Recursive (RD=1) resolution seam used by [`super::QueryClient`].
#[async_trait]
pub trait RecursiveResolver: Send + Sync {
    /// Resolves `name` for `rdtype`.
    ///
    /// # Errors
    ///
    /// Returns a [`QueryError`] for failures that are neither a response code
    /// nor a timeout.
    async fn resolve(&self, name: &str, rdtype: RecordType) -> Result<QueryResult, QueryError>;
}

#[async_trait]
impl RecursiveResolver for TokioAsyncResolver {
    async fn resolve(&self, name: &str, rdtype: RecordType) -> Result<QueryResult, QueryError> {
        let outcome = self.lookup(name, rdtype).await;
        classify_lookup(name, rdtype, outcome)
    }
}

/// Maps a resolver lookup onto a [`QueryResult`].
///
/// An empty NOERROR answer becomes NOANSWER, other negative response codes
/// keep their status and a resolver timeout becomes TIMEOUT.
pub(crate) fn classify_lookup(
    name: &str,
    rdtype: RecordType,
    outcome: Result<Lookup, ResolveError>,
) -> Result<QueryResult, QueryError> {
    let error = match outcome {
        Ok(lookup) => {
            let answer_records: Vec<String> = lookup
                .record_iter()
                .filter(|record| record.record_type() == rdtype)
                .filter_map(Record::data)
                .map(render_rdata)
                .collect();
            let status = if answer_records.is_empty() {
                QueryStatus::NoAnswer
            } else {
                QueryStatus::NoError
            };
            return Ok(QueryResult {
                status,
                rdtype,
                answer_records,
                authority_records: Vec::new(),
                flags: ResponseFlags {
                    recursion_desired: true,
                    ..ResponseFlags::default()
                },
            });
        }
        Err(error) => error,
    };

    let status = match error.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => match *response_code {
            ResponseCode::NoError => Some(QueryStatus::NoAnswer),
            code => Some(QueryStatus::from_rcode(code)),
        },
        ResolveErrorKind::Timeout => Some(QueryStatus::Timeout),
        ResolveErrorKind::Proto(proto) if matches!(proto.kind(), ProtoErrorKind::Timeout) => {
            Some(QueryStatus::Timeout)
        }
        _ => None,
    };
    match status {
        Some(status) => Ok(QueryResult::status_only(status, rdtype)),
        None => Err(QueryError::Resolve {
            name: name.to_string(),
            source: error,
        }),
    }
}
