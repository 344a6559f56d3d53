//! UDP and TCP DNS listener loops.
//!
//! Each accepted query runs as its own task against the dispatcher.
//! Unparseable datagrams are dropped; protocol-level failures still get
//! a response because the dispatcher never fails.

use hickory_proto::op::Message;
use junction_dns_application::services::forwarder;
use junction_dns_application::HandleDnsQueryUseCase;
use junction_dns_domain::{DomainError, Transport};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, UdpSocket};
use tracing::{debug, info, warn};

const MAX_UDP_PACKET: usize = 4096;

/// Idle time after which a quiet TCP client connection is closed.
const TCP_IDLE_TIMEOUT: Duration = Duration::from_secs(10);

pub async fn serve_udp(
    bind: SocketAddr,
    dispatcher: Arc<HandleDnsQueryUseCase>,
) -> Result<(), DomainError> {
    let socket = Arc::new(
        UdpSocket::bind(bind)
            .await
            .map_err(|e| DomainError::Io(format!("udp bind {}: {}", bind, e)))?,
    );
    info!(addr = %bind, "udp dns listener ready");

    let mut buf = [0u8; MAX_UDP_PACKET];
    loop {
        let (len, peer) = match socket.recv_from(&mut buf).await {
            Ok(received) => received,
            Err(e) => {
                warn!(error = %e, "udp recv failed");
                continue;
            }
        };

        let payload = buf[..len].to_vec();
        let socket = socket.clone();
        let dispatcher = dispatcher.clone();
        tokio::spawn(async move {
            let request = match Message::from_vec(&payload) {
                Ok(message) => message,
                Err(e) => {
                    warn!(peer = %peer, error = %e, "dropping unparseable udp query");
                    return;
                }
            };

            let response = dispatcher.execute(&request, Transport::Udp).await;
            match forwarder::encode(&response.message) {
                Ok(bytes) => {
                    if let Err(e) = socket.send_to(&bytes, peer).await {
                        warn!(peer = %peer, error = %e, "failed to send udp response");
                    }
                }
                Err(e) => warn!(peer = %peer, error = %e, "failed to encode udp response"),
            }
        });
    }
}

pub async fn serve_tcp(
    bind: SocketAddr,
    dispatcher: Arc<HandleDnsQueryUseCase>,
) -> Result<(), DomainError> {
    let listener = TcpListener::bind(bind)
        .await
        .map_err(|e| DomainError::Io(format!("tcp bind {}: {}", bind, e)))?;
    info!(addr = %bind, "tcp dns listener ready");

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "tcp accept failed");
                continue;
            }
        };
        tokio::spawn(handle_tcp_connection(stream, peer, dispatcher.clone()));
    }
}

async fn handle_tcp_connection(
    mut stream: TcpStream,
    peer: SocketAddr,
    dispatcher: Arc<HandleDnsQueryUseCase>,
) {
    loop {
        let mut len_buf = [0u8; 2];
        match tokio::time::timeout(TCP_IDLE_TIMEOUT, stream.read_exact(&mut len_buf)).await {
            Ok(Ok(_)) => {}
            Ok(Err(_)) | Err(_) => {
                debug!(peer = %peer, "closing tcp connection");
                return;
            }
        }

        let len = u16::from_be_bytes(len_buf) as usize;
        if len == 0 {
            return;
        }
        let mut payload = vec![0u8; len];
        if stream.read_exact(&mut payload).await.is_err() {
            return;
        }

        let request = match Message::from_vec(&payload) {
            Ok(message) => message,
            Err(e) => {
                warn!(peer = %peer, error = %e, "dropping unparseable tcp query");
                return;
            }
        };

        let response = dispatcher.execute(&request, Transport::Tcp).await;
        let bytes = match forwarder::encode(&response.message) {
            Ok(bytes) => bytes,
            Err(e) => {
                warn!(peer = %peer, error = %e, "failed to encode tcp response");
                return;
            }
        };
        let Ok(framed_len) = u16::try_from(bytes.len()) else {
            warn!(peer = %peer, bytes = bytes.len(), "tcp response too large to frame");
            return;
        };

        let write = async {
            stream.write_all(&framed_len.to_be_bytes()).await?;
            stream.write_all(&bytes).await?;
            stream.flush().await
        };
        if let Err(e) = write.await {
            warn!(peer = %peer, error = %e, "failed to send tcp response");
            return;
        }
    }
}
