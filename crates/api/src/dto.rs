use junction_dns_domain::{RouteKind, RoutePolicy};
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// JSON shape of a route policy as the configuration API speaks it.
/// Sequence fields may be omitted on input; `active` defaults to false
/// so a record must be switched on explicitly.
#[derive(Debug, Serialize, Deserialize)]
pub struct RouteDto {
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

impl From<RoutePolicy> for RouteDto {
    fn from(policy: RoutePolicy) -> Self {
        Self {
            domain: policy.domain,
            kind: policy.kind,
            active: policy.active,
            nameservers: policy.nameservers,
            addresses: policy.addresses,
            cnames: policy.cnames,
            txts: policy.txts,
        }
    }
}

impl From<RouteDto> for RoutePolicy {
    fn from(dto: RouteDto) -> Self {
        Self {
            domain: dto.domain,
            kind: dto.kind,
            active: dto.active,
            nameservers: dto.nameservers,
            addresses: dto.addresses,
            cnames: dto.cnames,
            txts: dto.txts,
        }
    }
}
