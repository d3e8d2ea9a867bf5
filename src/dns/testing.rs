//! Scripted in-memory transport for unit tests.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, NS};
use hickory_proto::rr::{Name, RData, Record, RecordType};

use super::client::{classify, QueryClient, QueryMode};
use super::message::build_query;
use super::query::QueryResult;
use super::recursive::RecursiveResolver;
use super::transport::DnsTransport;
use crate::error_handling::{QueryError, TransportError};

pub const RESOLVER: &str = "127.0.0.53:53";

#[derive(Clone)]
pub enum Scripted {
    Reply(Message),
    Timeout,
    Fault,
}

type Key = (SocketAddr, String, RecordType);

/// Replies from a table keyed by (server, qname, qtype). Unscripted queries
/// time out.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<Key, Scripted>,
    log: Mutex<Vec<Key>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resolver() -> SocketAddr {
        RESOLVER.parse().unwrap()
    }

    pub fn on(mut self, server: &str, qname: &str, rdtype: RecordType, reply: Scripted) -> Self {
        let server: SocketAddr = server.parse().unwrap();
        self.replies
            .insert((server, qname.to_ascii_lowercase(), rdtype), reply);
        self
    }

    /// Scripts a reply from the recursive resolver.
    pub fn recursive(self, qname: &str, rdtype: RecordType, reply: Scripted) -> Self {
        self.on(RESOLVER, qname, rdtype, reply)
    }

    /// Scripts a nameserver host and its address lookup in one go.
    pub fn host(self, hostname: &str, ip: Ipv4Addr) -> Self {
        self.recursive(hostname, RecordType::A, Scripted::Reply(a_reply(hostname, ip)))
    }

    /// Number of queries sent to `server` so far.
    pub fn queries_to(&self, server: &str) -> usize {
        let server: SocketAddr = server.parse().unwrap();
        self.log
            .lock()
            .unwrap()
            .iter()
            .filter(|(addr, _, _)| *addr == server)
            .count()
    }
}

#[async_trait]
impl DnsTransport for ScriptedTransport {
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        _timeout: Duration,
    ) -> Result<Message, TransportError> {
        let query = &request.queries()[0];
        let key = (
            server,
            query.name().to_lowercase().to_ascii(),
            query.query_type(),
        );
        self.log.lock().unwrap().push(key.clone());

        match self.replies.get(&key) {
            Some(Scripted::Reply(template)) => {
                let mut reply = template.clone();
                reply.set_id(request.id());
                Ok(reply)
            }
            Some(Scripted::Fault) => Err(TransportError::Io {
                server,
                source: std::io::Error::new(std::io::ErrorKind::ConnectionReset, "scripted fault"),
            }),
            Some(Scripted::Timeout) | None => Err(TransportError::Timeout(server)),
        }
    }
}

/// Full resolution answered from the rows scripted for [`RESOLVER`].
#[async_trait]
impl RecursiveResolver for ScriptedTransport {
    async fn resolve(&self, name: &str, rdtype: RecordType) -> Result<QueryResult, QueryError> {
        let request = build_query(name, rdtype, true)?;
        let outcome = self
            .exchange(&request, Self::resolver(), Duration::from_secs(1))
            .await;
        classify(rdtype, QueryMode::Recursive, outcome)
    }
}

pub fn client(transport: Arc<ScriptedTransport>) -> QueryClient {
    QueryClient::new(transport.clone(), transport, Duration::from_secs(1))
}

fn name(value: &str) -> Name {
    Name::from_ascii(value).unwrap()
}

fn response(authoritative: bool, rcode: ResponseCode) -> Message {
    let mut message = Message::new();
    message
        .set_message_type(MessageType::Response)
        .set_authoritative(authoritative)
        .set_response_code(rcode);
    message
}

/// NOERROR with the NS set in the answer section.
pub fn ns_answer(zone: &str, nameservers: &[&str], authoritative: bool) -> Message {
    let mut message = response(authoritative, ResponseCode::NoError);
    for ns in nameservers {
        message.add_answer(Record::from_rdata(name(zone), 3600, RData::NS(NS(name(ns)))));
    }
    message
}

/// NOERROR referral: empty answer, NS set in the authority section.
pub fn referral(zone: &str, nameservers: &[&str]) -> Message {
    let mut message = response(false, ResponseCode::NoError);
    for ns in nameservers {
        message.add_name_server(Record::from_rdata(name(zone), 172800, RData::NS(NS(name(ns)))));
    }
    message
}

pub fn a_reply(host: &str, ip: Ipv4Addr) -> Message {
    let mut message = response(false, ResponseCode::NoError);
    message.add_answer(Record::from_rdata(name(host), 300, RData::A(A(ip))));
    message
}

pub fn rcode_reply(rcode: ResponseCode, authoritative: bool) -> Message {
    response(authoritative, rcode)
}
