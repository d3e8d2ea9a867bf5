//! DNS message construction and record extraction.
//!
//! Builds query messages with `hickory-proto` and reads typed records back out
//! of responses. Authority-section nameservers are taken from the NS records
//! themselves, never from a formatted representation of the section.

use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};

use super::zone::Nameserver;
use crate::error_handling::QueryError;

/// Builds a single-question query message with a random ID.
///
/// # Arguments
///
/// * `name` - Name to query (presentation format)
/// * `rdtype` - Record type to ask for
/// * `recursion_desired` - `true` for full resolution through a recursive
///   resolver, `false` for an iterative query to a nameserver
///
/// # Errors
///
/// Returns `QueryError::Encode` if `name` is not a valid DNS name.
pub fn build_query(
    name: &str,
    rdtype: RecordType,
    recursion_desired: bool,
) -> Result<Message, QueryError> {
    let qname = Name::from_ascii(name).map_err(|source| QueryError::Encode {
        name: name.to_string(),
        source,
    })?;

    let mut query = Query::query(qname, rdtype);
    query.set_query_class(DNSClass::IN);

    let mut message = Message::new();
    message
        .set_id(rand::random::<u16>())
        .set_message_type(MessageType::Query)
        .set_op_code(OpCode::Query)
        .set_recursion_desired(recursion_desired)
        .add_query(query);

    Ok(message)
}

/// Answer records of the requested type, rendered in response order.
pub fn answer_strings(message: &Message, rdtype: RecordType) -> Vec<String> {
    message
        .answers()
        .iter()
        .filter(|record| record.record_type() == rdtype)
        .filter_map(Record::data)
        .map(render_rdata)
        .collect()
}

/// NS hostnames from the authority section, in response order.
///
/// Referral responses carry the delegation here while their answer section
/// is empty. SOA and other authority records are ignored.
pub fn authority_nameservers(message: &Message) -> Vec<Nameserver> {
    message
        .name_servers()
        .iter()
        .filter_map(|record| match record.data() {
            Some(RData::NS(ns)) => Some(Nameserver::from_name(&ns.0)),
            _ => None,
        })
        .collect()
}

pub(super) fn render_rdata(rdata: &RData) -> String {
    match rdata {
        RData::NS(ns) => Nameserver::from_name(&ns.0).into_string(),
        other => other.to_string(),
    }
}
