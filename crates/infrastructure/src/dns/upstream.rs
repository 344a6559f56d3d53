//! Single-shot DNS exchanges with upstream nameservers.
//!
//! UDP sends the message as-is; TCP uses the RFC 1035 2-byte length
//! prefix. Every leg of an attempt is bounded by the caller's timeout.

use async_trait::async_trait;
use hickory_proto::op::Message;
use junction_dns_application::ports::UpstreamExchange;
use junction_dns_domain::{DomainError, Transport, UpstreamAddr};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::debug;

/// Maximum UDP response size we accept (EDNS-sized buffer).
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct NetUpstreamExchange;

#[async_trait]
impl UpstreamExchange for NetUpstreamExchange {
    async fn exchange(
        &self,
        payload: &[u8],
        server: &UpstreamAddr,
        transport: Transport,
        timeout: Duration,
    ) -> Result<Message, DomainError> {
        let addr = resolve_addr(server, timeout).await?;
        let bytes = match transport {
            Transport::Udp => udp_exchange(payload, addr, timeout).await?,
            Transport::Tcp => tcp_exchange(payload, addr, timeout).await?,
        };

        Message::from_vec(&bytes).map_err(|e| DomainError::MessageDecode(e.to_string()))
    }
}

/// Hostname nameservers go through the system resolver; the first
/// returned address is used.
async fn resolve_addr(server: &UpstreamAddr, timeout: Duration) -> Result<SocketAddr, DomainError> {
    match server {
        UpstreamAddr::Resolved(addr) => Ok(*addr),
        UpstreamAddr::Unresolved { hostname, port } => {
            let mut addrs = tokio::time::timeout(
                timeout,
                tokio::net::lookup_host((hostname.as_str(), *port)),
            )
            .await
            .map_err(|_| DomainError::UpstreamTimeout {
                server: server.to_string(),
            })?
            .map_err(|e| DomainError::UpstreamIo {
                server: server.to_string(),
                detail: format!("resolve: {}", e),
            })?;

            addrs.next().ok_or_else(|| DomainError::UpstreamIo {
                server: server.to_string(),
                detail: "hostname resolved to no addresses".to_string(),
            })
        }
    }
}

async fn udp_exchange(
    payload: &[u8],
    server: SocketAddr,
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let bind_addr: SocketAddr = if server.is_ipv4() {
        "0.0.0.0:0".parse().map_err(|_| unreachable_bind(server))?
    } else {
        "[::]:0".parse().map_err(|_| unreachable_bind(server))?
    };

    let socket = UdpSocket::bind(bind_addr)
        .await
        .map_err(|e| io_error(server, "bind", e))?;
    socket
        .connect(server)
        .await
        .map_err(|e| io_error(server, "connect", e))?;

    tokio::time::timeout(timeout, socket.send(payload))
        .await
        .map_err(|_| timed_out(server))?
        .map_err(|e| io_error(server, "send", e))?;

    let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
    let len = tokio::time::timeout(timeout, socket.recv(&mut buf))
        .await
        .map_err(|_| timed_out(server))?
        .map_err(|e| io_error(server, "recv", e))?;

    buf.truncate(len);
    // A datagram from the right peer but with a foreign id is not our
    // answer.
    if len < 2 || buf[..2] != payload[..2] {
        return Err(DomainError::UpstreamIo {
            server: server.to_string(),
            detail: "response id does not match query".to_string(),
        });
    }
    debug!(server = %server, bytes = len, "udp upstream replied");
    Ok(buf)
}

async fn tcp_exchange(
    payload: &[u8],
    server: SocketAddr,
    timeout: Duration,
) -> Result<Vec<u8>, DomainError> {
    let mut stream = tokio::time::timeout(timeout, TcpStream::connect(server))
        .await
        .map_err(|_| timed_out(server))?
        .map_err(|e| io_error(server, "connect", e))?;
    stream
        .set_nodelay(true)
        .map_err(|e| io_error(server, "nodelay", e))?;

    let len = u16::try_from(payload.len())
        .map_err(|_| DomainError::MessageEncode("query exceeds 65535 bytes".to_string()))?;

    tokio::time::timeout(timeout, async {
        stream.write_all(&len.to_be_bytes()).await?;
        stream.write_all(payload).await?;
        stream.flush().await
    })
    .await
    .map_err(|_| timed_out(server))?
    .map_err(|e| io_error(server, "send", e))?;

    let response = tokio::time::timeout(timeout, async {
        let mut len_buf = [0u8; 2];
        stream.read_exact(&mut len_buf).await?;
        let mut body = vec![0u8; u16::from_be_bytes(len_buf) as usize];
        stream.read_exact(&mut body).await?;
        Ok::<_, std::io::Error>(body)
    })
    .await
    .map_err(|_| timed_out(server))?
    .map_err(|e| io_error(server, "recv", e))?;

    debug!(server = %server, bytes = response.len(), "tcp upstream replied");
    Ok(response)
}

fn timed_out(server: SocketAddr) -> DomainError {
    DomainError::UpstreamTimeout {
        server: server.to_string(),
    }
}

fn io_error(server: SocketAddr, stage: &str, e: std::io::Error) -> DomainError {
    DomainError::UpstreamIo {
        server: server.to_string(),
        detail: format!("{}: {}", stage, e),
    }
}

fn unreachable_bind(server: SocketAddr) -> DomainError {
    DomainError::UpstreamIo {
        server: server.to_string(),
        detail: "wildcard bind address failed to parse".to_string(),
    }
}
