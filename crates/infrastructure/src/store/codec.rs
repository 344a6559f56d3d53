//! Compact binary form of stored route records, distinct from the JSON
//! shape the configuration API speaks.

use junction_dns_domain::{DomainError, RoutePolicy};

pub fn encode(policy: &RoutePolicy) -> Result<Vec<u8>, DomainError> {
    postcard::to_stdvec(policy).map_err(|e| DomainError::PolicyEncode(e.to_string()))
}

pub fn decode(bytes: &[u8]) -> Result<RoutePolicy, DomainError> {
    postcard::from_bytes(bytes).map_err(|e| DomainError::PolicyDecode(e.to_string()))
}
