use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// How queries hitting a domain (or any of its subdomains) are answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteKind {
    Forwarding,
    Static,
}

/// Routing configuration for one domain, keyed by its canonical name.
///
/// `nameservers` applies only to forwarding policies; `addresses`,
/// `cnames` and `txts` only to static ones. Fields irrelevant to the
/// kind are carried but ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePolicy {
    pub domain: String,
    pub kind: RouteKind,
    #[serde(default)]
    pub active: bool,
    #[serde(default)]
    pub nameservers: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<IpAddr>,
    #[serde(default)]
    pub cnames: Vec<String>,
    #[serde(default)]
    pub txts: Vec<Vec<String>>,
}

impl RoutePolicy {
    /// The policy applied when no configured ancestor matches: forward
    /// to well-known public resolvers.
    pub fn built_in_default() -> Self {
        Self {
            domain: ROOT_KEY.to_string(),
            kind: RouteKind::Forwarding,
            active: true,
            nameservers: vec!["8.8.8.8".to_string(), "8.8.4.4".to_string()],
            addresses: Vec::new(),
            cnames: Vec::new(),
            txts: Vec::new(),
        }
    }
}

/// Store key for the DNS root.
pub const ROOT_KEY: &str = ".";

/// Canonical store-key form of a domain name: lowercase, no trailing
/// dot. The empty name and the bare root label both map to `"."`.
pub fn canonical_key(name: &str) -> String {
    let trimmed = name.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        ROOT_KEY.to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

/// One step up the label hierarchy: strips the leftmost label. Returns
/// `None` at the root. A single-label name steps straight to the root
/// rather than producing an empty remainder.
pub fn parent_suffix(key: &str) -> Option<&str> {
    if key == ROOT_KEY {
        return None;
    }
    match key.split_once('.') {
        Some((_, rest)) if !rest.is_empty() => Some(rest),
        _ => Some(ROOT_KEY),
    }
}
