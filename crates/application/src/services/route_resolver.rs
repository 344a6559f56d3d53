use crate::ports::RouteStore;
use junction_dns_domain::{canonical_key, parent_suffix, RoutePolicy};
use std::sync::{Arc, LazyLock};
use tracing::{debug, warn};

/// Built once; the walk falls through to this for every name with no
/// configured active ancestor, root included.
static DEFAULT_ROUTE: LazyLock<RoutePolicy> = LazyLock::new(RoutePolicy::built_in_default);

/// Maps a queried name to its route policy by longest-suffix match.
pub struct RouteResolver {
    store: Arc<dyn RouteStore>,
}

impl RouteResolver {
    pub fn new(store: Arc<dyn RouteStore>) -> Self {
        Self { store }
    }

    /// The policy used when nothing is configured.
    pub fn default_route() -> &'static RoutePolicy {
        &DEFAULT_ROUTE
    }

    /// Resolves `name` to a policy. Never fails: store errors and
    /// inactive or undecodable records are skipped in favor of the next
    /// ancestor, and the root always yields at least the built-in
    /// default forwarding policy.
    pub async fn resolve(&self, name: &str) -> RoutePolicy {
        let mut key = canonical_key(name);
        loop {
            match self.store.get(&key).await {
                Ok(Some(policy)) if policy.active => {
                    debug!(key = %key, kind = ?policy.kind, "route policy matched");
                    return policy;
                }
                Ok(Some(_)) => debug!(key = %key, "inactive route skipped"),
                Ok(None) => {}
                Err(e) => {
                    warn!(key = %key, error = %e, "route lookup failed, trying ancestor")
                }
            }
            match parent_suffix(&key).map(str::to_owned) {
                Some(parent) => key = parent,
                None => {
                    debug!(name = %name, "no configured route, using default");
                    return DEFAULT_ROUTE.clone();
                }
            }
        }
    }
}
