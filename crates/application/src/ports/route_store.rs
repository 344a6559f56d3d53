use async_trait::async_trait;
use junction_dns_domain::{DomainError, RoutePolicy};

/// Read/write access to persisted route policies, keyed by canonical
/// domain name. Implementations must tolerate concurrent readers; the
/// query path only ever reads.
#[async_trait]
pub trait RouteStore: Send + Sync {
    /// Fetches the policy stored under `key`. An unreadable stored
    /// record reads as absent, not as an error.
    async fn get(&self, key: &str) -> Result<Option<RoutePolicy>, DomainError>;

    /// Stores `policy` under its domain key, overwriting any previous
    /// record.
    async fn put(&self, policy: &RoutePolicy) -> Result<(), DomainError>;

    /// All stored policies, in store iteration order.
    async fn list(&self) -> Result<Vec<RoutePolicy>, DomainError>;
}
