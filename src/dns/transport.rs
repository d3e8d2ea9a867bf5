//! DNS transport: one message to one server.
//!
//! Standard DNS transport (RFC 1035 §4.2). The query goes out over UDP; a
//! response with the TC (truncated) bit set is retried once over TCP with the
//! 2-byte length framing. Every exchange binds a fresh socket, there is no
//! pooling. One deadline covers the whole exchange, including the TCP retry.

use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use async_trait::async_trait;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::BinEncodable;
use log::{debug, warn};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};

use crate::config::MAX_UDP_RESPONSE_SIZE;
use crate::error_handling::TransportError;

/// Sends a DNS message to a server and returns the decoded response.
///
/// Implementations must report an expired deadline as
/// [`TransportError::Timeout`]; every other error is treated as a fault of the
/// tool rather than a property of the server being checked.
#[async_trait]
pub trait DnsTransport: Send + Sync {
    /// Sends `request` to `server` and waits at most `timeout` for the reply.
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Message, TransportError>;
}

/// UDP transport with TCP fallback on truncation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NetworkTransport;

impl NetworkTransport {
    /// Creates the transport.
    pub fn new() -> Self {
        Self
    }

    async fn exchange_udp(
        &self,
        bytes: &[u8],
        id: u16,
        server: SocketAddr,
    ) -> Result<Message, TransportError> {
        let io_err = |source| TransportError::Io { server, source };

        // Bind to ephemeral port (0 = OS assigns)
        let bind_addr: SocketAddr = if server.is_ipv4() {
            (Ipv4Addr::UNSPECIFIED, 0).into()
        } else {
            (Ipv6Addr::UNSPECIFIED, 0).into()
        };
        let socket = UdpSocket::bind(bind_addr).await.map_err(io_err)?;
        socket.send_to(bytes, server).await.map_err(io_err)?;
        debug!("UDP query {id} sent to {server} ({} bytes)", bytes.len());

        let mut recv_buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        loop {
            let (received, from) = socket.recv_from(&mut recv_buf).await.map_err(io_err)?;
            if from != server {
                warn!("Ignoring UDP response from unexpected source {from} (expected {server})");
                continue;
            }
            let response = Message::from_vec(&recv_buf[..received])
                .map_err(|source| TransportError::Protocol { server, source })?;
            if response.id() != id {
                debug!(
                    "Ignoring response with mismatched ID {} from {server} (expected {id})",
                    response.id()
                );
                continue;
            }
            return Ok(response);
        }
    }

    async fn exchange_tcp(&self, bytes: &[u8], server: SocketAddr) -> Result<Message, TransportError> {
        let io_err = |source| TransportError::Io { server, source };

        let length = u16::try_from(bytes.len()).map_err(|_| {
            io_err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "DNS message too large for TCP framing",
            ))
        })?;

        let mut stream = TcpStream::connect(server).await.map_err(io_err)?;
        stream.set_nodelay(true).map_err(io_err)?;

        let mut framed = Vec::with_capacity(bytes.len() + 2);
        framed.extend_from_slice(&length.to_be_bytes());
        framed.extend_from_slice(bytes);
        stream.write_all(&framed).await.map_err(io_err)?;

        let response_len = stream.read_u16().await.map_err(io_err)?;
        let mut response = vec![0u8; usize::from(response_len)];
        stream.read_exact(&mut response).await.map_err(io_err)?;
        debug!("TCP response received from {server} ({response_len} bytes)");

        Message::from_vec(&response).map_err(|source| TransportError::Protocol { server, source })
    }
}

#[async_trait]
impl DnsTransport for NetworkTransport {
    async fn exchange(
        &self,
        request: &Message,
        server: SocketAddr,
        timeout: Duration,
    ) -> Result<Message, TransportError> {
        let bytes = request
            .to_bytes()
            .map_err(|source| TransportError::Protocol { server, source })?;
        let id = request.id();

        let exchange = async {
            let response = self.exchange_udp(&bytes, id, server).await?;
            if response.truncated() {
                debug!("Response from {server} truncated, retrying over TCP");
                return self.exchange_tcp(&bytes, server).await;
            }
            Ok(response)
        };

        tokio::time::timeout(timeout, exchange)
            .await
            .map_err(|_| TransportError::Timeout(server))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::message::build_query;
    use hickory_proto::op::{MessageType, ResponseCode};
    use hickory_proto::rr::RecordType;

    /// Answers one UDP query on a local socket with the given flags.
    async fn serve_once(socket: UdpSocket, truncated: bool) {
        let mut buf = vec![0u8; 512];
        let (len, peer) = socket.recv_from(&mut buf).await.unwrap();
        let request = Message::from_vec(&buf[..len]).unwrap();
        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::Refused)
            .set_truncated(truncated);
        let bytes = response.to_bytes().unwrap();
        socket.send_to(&bytes, peer).await.unwrap();
    }

    #[tokio::test]
    async fn test_udp_exchange_against_local_server() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = socket.local_addr().unwrap();
        tokio::spawn(serve_once(socket, false));

        let request = build_query("example.com.", RecordType::NS, false).unwrap();
        let response = NetworkTransport::new()
            .exchange(&request, server, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(response.id(), request.id());
        assert_eq!(response.response_code(), ResponseCode::Refused);
    }

    /// Answers one length-framed TCP query with NXDOMAIN.
    async fn serve_tcp_once(listener: tokio::net::TcpListener) {
        let (mut stream, _) = listener.accept().await.unwrap();
        let len = stream.read_u16().await.unwrap();
        let mut buf = vec![0u8; usize::from(len)];
        stream.read_exact(&mut buf).await.unwrap();
        let request = Message::from_vec(&buf).unwrap();

        let mut response = Message::new();
        response
            .set_id(request.id())
            .set_message_type(MessageType::Response)
            .set_response_code(ResponseCode::NXDomain);
        let bytes = response.to_bytes().unwrap();
        let mut framed = (bytes.len() as u16).to_be_bytes().to_vec();
        framed.extend_from_slice(&bytes);
        stream.write_all(&framed).await.unwrap();
    }

    #[tokio::test]
    async fn test_truncated_udp_response_is_retried_over_tcp() {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = socket.local_addr().unwrap();
        let listener = tokio::net::TcpListener::bind(server).await.unwrap();
        tokio::spawn(serve_once(socket, true));
        tokio::spawn(serve_tcp_once(listener));

        let request = build_query("example.com.", RecordType::NS, false).unwrap();
        let response = NetworkTransport::new()
            .exchange(&request, server, Duration::from_secs(2))
            .await
            .unwrap();
        assert_eq!(response.id(), request.id());
        assert_eq!(response.response_code(), ResponseCode::NXDomain);
        assert!(!response.truncated());
    }

    #[tokio::test]
    async fn test_silent_server_times_out() {
        // Bound but never answered
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let server = socket.local_addr().unwrap();

        let request = build_query("example.com.", RecordType::NS, false).unwrap();
        let result = NetworkTransport::new()
            .exchange(&request, server, Duration::from_millis(200))
            .await;
        assert!(matches!(result, Err(TransportError::Timeout(addr)) if addr == server));
        drop(socket);
    }
}
