use async_trait::async_trait;
use hickory_proto::op::Message;
use junction_dns_domain::{DomainError, Transport, UpstreamAddr};
use std::time::Duration;

/// One request/response round trip with an upstream nameserver.
#[async_trait]
pub trait UpstreamExchange: Send + Sync {
    /// Sends an already wire-encoded query to `server` over the given
    /// transport and returns the decoded reply. Hostname servers are
    /// resolved by the implementation; a resolution failure is a failed
    /// attempt. The whole round trip is bounded by `timeout`.
    async fn exchange(
        &self,
        payload: &[u8],
        server: &UpstreamAddr,
        transport: Transport,
        timeout: Duration,
    ) -> Result<Message, DomainError>;
}
