use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid domain name: {0}")]
    InvalidDomainName(String),

    #[error("Invalid upstream address: {0}")]
    InvalidUpstreamAddr(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Route record could not be decoded: {0}")]
    PolicyDecode(String),

    #[error("Route record could not be encoded: {0}")]
    PolicyEncode(String),

    #[error("DNS message could not be encoded: {0}")]
    MessageEncode(String),

    #[error("DNS message could not be decoded: {0}")]
    MessageDecode(String),

    #[error("Forwarding policy has no nameservers configured")]
    NoNameservers,

    #[error("All {attempts} upstream nameservers failed")]
    UpstreamsExhausted { attempts: usize },

    #[error("Upstream {server} timed out")]
    UpstreamTimeout { server: String },

    #[error("Upstream {server} failed: {detail}")]
    UpstreamIo { server: String, detail: String },

    #[error("CNAME chain too deep while resolving {0}")]
    CnameChainTooDeep(String),

    #[error("I/O error: {0}")]
    Io(String),
}
