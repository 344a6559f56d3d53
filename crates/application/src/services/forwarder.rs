use crate::ports::UpstreamExchange;
use hickory_proto::op::Message;
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use junction_dns_domain::{DomainError, Transport, UpstreamAddr};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// How long a single upstream attempt may take before the next
/// nameserver is tried.
pub const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(2);

/// Relays a query to configured nameservers in order, returning the
/// first successful reply. One pass, no retries, no merging.
pub struct Forwarder {
    exchange: Arc<dyn UpstreamExchange>,
    attempt_timeout: Duration,
}

impl Forwarder {
    pub fn new(exchange: Arc<dyn UpstreamExchange>) -> Self {
        Self {
            exchange,
            attempt_timeout: ATTEMPT_TIMEOUT,
        }
    }

    pub fn with_timeout(exchange: Arc<dyn UpstreamExchange>, attempt_timeout: Duration) -> Self {
        Self {
            exchange,
            attempt_timeout,
        }
    }

    /// Forwards `request` verbatim. An empty nameserver list is a local
    /// misconfiguration ([`DomainError::NoNameservers`]); a list where
    /// every attempt failed is upstream unavailability
    /// ([`DomainError::UpstreamsExhausted`]).
    pub async fn forward(
        &self,
        nameservers: &[String],
        request: &Message,
        transport: Transport,
    ) -> Result<Message, DomainError> {
        if nameservers.is_empty() {
            return Err(DomainError::NoNameservers);
        }

        let payload = encode(request)?;

        for entry in nameservers {
            let upstream: UpstreamAddr = match entry.parse() {
                Ok(addr) => addr,
                Err(e) => {
                    warn!(nameserver = %entry, error = %e, "skipping unusable nameserver");
                    continue;
                }
            };

            match self
                .exchange
                .exchange(&payload, &upstream, transport, self.attempt_timeout)
                .await
            {
                Ok(response) => {
                    debug!(server = %upstream, transport = %transport, "upstream answered");
                    return Ok(response);
                }
                Err(e) => {
                    warn!(server = %upstream, transport = %transport, error = %e, "upstream attempt failed");
                }
            }
        }

        Err(DomainError::UpstreamsExhausted {
            attempts: nameservers.len(),
        })
    }
}

/// Wire-encodes a message for the upstream leg.
pub fn encode(message: &Message) -> Result<Vec<u8>, DomainError> {
    let mut buf = Vec::with_capacity(512);
    let mut encoder = BinEncoder::new(&mut buf);
    message
        .emit(&mut encoder)
        .map_err(|e| DomainError::MessageEncode(e.to_string()))?;
    Ok(buf)
}
