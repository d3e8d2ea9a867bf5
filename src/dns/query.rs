//! Normalized query outcomes.
//!
//! Every DNS query ends up as one [`QueryResult`]: a status tag plus whatever
//! records the response carried. Callers branch on [`QueryStatus`] rather than
//! on transport errors.

use std::fmt;

use hickory_proto::op::{Header, ResponseCode};
use hickory_proto::rr::RecordType;

use super::zone::Nameserver;

/// Outcome class of one query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryStatus {
    /// Response with rcode NOERROR.
    NoError,
    /// The queried name does not exist.
    NxDomain,
    /// A name that should not exist does.
    YxDomain,
    /// A full resolution succeeded but returned no record of the queried type.
    NoAnswer,
    /// No response within the per-query timeout.
    Timeout,
    /// Any other response code (SERVFAIL, REFUSED, NOTAUTH, ...).
    Rcode(ResponseCode),
}

impl QueryStatus {
    /// Maps a response code onto a status; NOERROR maps to [`QueryStatus::NoError`].
    pub fn from_rcode(rcode: ResponseCode) -> Self {
        match rcode {
            ResponseCode::NoError => QueryStatus::NoError,
            ResponseCode::NXDomain => QueryStatus::NxDomain,
            ResponseCode::YXDomain => QueryStatus::YxDomain,
            other => QueryStatus::Rcode(other),
        }
    }
}

impl fmt::Display for QueryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryStatus::NoError => f.write_str("NOERROR"),
            QueryStatus::NxDomain => f.write_str("NXDOMAIN"),
            QueryStatus::YxDomain => f.write_str("YXDOMAIN"),
            QueryStatus::NoAnswer => f.write_str("NOANSWER"),
            QueryStatus::Timeout => f.write_str("TIMEOUT"),
            QueryStatus::Rcode(rcode) => f.write_str(&rcode_name(*rcode)),
        }
    }
}

/// Mnemonic for a response code, `RCODE<n>` for codes without one.
fn rcode_name(rcode: ResponseCode) -> String {
    match rcode {
        ResponseCode::NoError => "NOERROR".to_string(),
        ResponseCode::FormErr => "FORMERR".to_string(),
        ResponseCode::ServFail => "SERVFAIL".to_string(),
        ResponseCode::NXDomain => "NXDOMAIN".to_string(),
        ResponseCode::NotImp => "NOTIMP".to_string(),
        ResponseCode::Refused => "REFUSED".to_string(),
        ResponseCode::YXDomain => "YXDOMAIN".to_string(),
        ResponseCode::YXRRSet => "YXRRSET".to_string(),
        ResponseCode::NXRRSet => "NXRRSET".to_string(),
        ResponseCode::NotAuth => "NOTAUTH".to_string(),
        ResponseCode::NotZone => "NOTZONE".to_string(),
        other => format!("RCODE{}", u16::from(other)),
    }
}

/// Header flags of a response.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResponseFlags {
    /// AA: the responding server is authoritative for the name.
    pub authoritative: bool,
    /// TC: the response did not fit and was cut short.
    pub truncated: bool,
    /// RD, echoed from the query.
    pub recursion_desired: bool,
    /// RA: the server offers recursion.
    pub recursion_available: bool,
}

impl From<&Header> for ResponseFlags {
    fn from(header: &Header) -> Self {
        Self {
            authoritative: header.authoritative(),
            truncated: header.truncated(),
            recursion_desired: header.recursion_desired(),
            recursion_available: header.recursion_available(),
        }
    }
}

impl fmt::Display for ResponseFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = [
            (self.authoritative, "AA"),
            (self.truncated, "TC"),
            (self.recursion_desired, "RD"),
            (self.recursion_available, "RA"),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
        .collect();
        f.write_str(&names.join(" "))
    }
}

/// The normalized outcome of one DNS query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResult {
    /// Outcome class.
    pub status: QueryStatus,
    /// Record type that was queried.
    pub rdtype: RecordType,
    /// Answer records of the queried type, in response order. NS targets are
    /// rendered as normalized FQDNs, other types in presentation format.
    pub answer_records: Vec<String>,
    /// NS hostnames from the authority section, in response order.
    pub authority_records: Vec<Nameserver>,
    /// Header flags; all clear when no response arrived.
    pub flags: ResponseFlags,
}

impl QueryResult {
    /// A result that carries only a status, as for timeouts.
    pub fn status_only(status: QueryStatus, rdtype: RecordType) -> Self {
        Self {
            status,
            rdtype,
            answer_records: Vec::new(),
            authority_records: Vec::new(),
            flags: ResponseFlags::default(),
        }
    }

    /// True for NOERROR.
    pub fn is_success(&self) -> bool {
        self.status == QueryStatus::NoError
    }

    /// Answer records read back as nameservers (meaningful for NS queries).
    pub fn answer_nameservers(&self) -> Vec<Nameserver> {
        self.answer_records
            .iter()
            .filter_map(|record| Nameserver::new(record).ok())
            .collect()
    }
}

impl fmt::Display for QueryResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "status={} rdtype={} flags=[{}] answers={:?} authority={:?}",
            self.status,
            self.rdtype,
            self.flags,
            self.answer_records,
            self.authority_records
                .iter()
                .map(Nameserver::as_str)
                .collect::<Vec<_>>()
        )
    }
}
