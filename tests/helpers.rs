// Shared test helpers: a scripted DNS transport and canned responses.
//
// This module provides common utilities used across multiple test files to reduce duplication.

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, NS};
use hickory_proto::rr::{Name, RData, Record, RecordType};

use lame_delegation::{
    classify, DnsTransport, QueryClient, QueryError, QueryMode, QueryResult, RecursiveResolver,
    TransportError,
};

pub const RESOLVER: &str = "127.0.0.53:53";

/// Replies by (server, qname, qtype); anything unscripted times out.
#[derive(Default)]
pub struct ScriptedTransport {
    replies: HashMap<(SocketAddr, String, RecordType), Message>,
}

#[allow(dead_code)] // Not every test file uses every helper
impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, server: &str, qname: &str, rdtype: RecordType, reply: Message) -> Self {
        self.replies.insert(
            (server.parse().unwrap(), qname.to_ascii_lowercase(), rdtype),
            reply,
        );
        self
    }

    pub fn recursive(self, qname: &str, rdtype: RecordType, reply: Message) -> Self {
        self.on(RESOLVER, qname, rdtype, reply)
    }

    pub fn host(self, hostname: &str, ip: Ipv4Addr) -> Self {
        self.recursive(hostname, RecordType::A, a_reply(hostname, ip))
    }

    /// Scripts the `example.` parent server's referral for `zone`.
    pub fn delegate(self, zone: &str, nameservers: &[&str]) -> Self {
        self.on("192.0.2.1:53", zone, RecordType::NS, referral(zone, nameservers))
    }

    pub fn into_client(self) -> QueryClient {
        let scripted = Arc::new(self);
        QueryClient::new(scripted.clone(), scripted, Duration::from_secs(1))
    }

    fn reply(&self, server: SocketAddr, qname: &str, rdtype: RecordType) -> Option<&Message> {
        self.replies.get(&(server, qname.to_ascii_lowercase(), rdtype))
    }
}

#[async_trait]
impl RecursiveResolver for ScriptedTransport {
    async fn resolve(&self, name: &str, rdtype: RecordType) -> Result<QueryResult, QueryError> {
        let resolver: SocketAddr = RESOLVER.parse().unwrap();
        let outcome = match self.reply(resolver, name, rdtype) {
            Some(reply) => Ok(reply.clone()),
            None => Err(TransportError::Timeout(resolver)),
        };
        classify(rdtype, QueryMode::Recursive, outcome)
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
        match self.reply(server, &query.name().to_ascii(), query.query_type()) {
            Some(template) => {
                let mut reply = template.clone();
                reply.set_id(request.id());
                Ok(reply)
            }
            None => Err(TransportError::Timeout(server)),
        }
    }
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

/// NOERROR referral with the NS set in the authority section.
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

/// An `example.` TLD served by one parent server at 192.0.2.1.
#[allow(dead_code)]
pub fn example_tld() -> ScriptedTransport {
    ScriptedTransport::new()
        .recursive("example.", RecordType::NS, ns_answer("example.", &["a.tld.test."], false))
        .host("a.tld.test.", Ipv4Addr::new(192, 0, 2, 1))
}
