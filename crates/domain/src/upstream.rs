use crate::DomainError;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;

/// Default port for plain DNS upstreams.
pub const DEFAULT_DNS_PORT: u16 = 53;

/// An upstream server address that may or may not be resolved to an IP.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum UpstreamAddr {
    Resolved(SocketAddr),
    Unresolved { hostname: String, port: u16 },
}

impl UpstreamAddr {
    pub fn socket_addr(&self) -> Option<SocketAddr> {
        match self {
            UpstreamAddr::Resolved(addr) => Some(*addr),
            UpstreamAddr::Unresolved { .. } => None,
        }
    }

    pub fn port(&self) -> u16 {
        match self {
            UpstreamAddr::Resolved(addr) => addr.port(),
            UpstreamAddr::Unresolved { port, .. } => *port,
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, UpstreamAddr::Unresolved { .. })
    }
}

impl FromStr for UpstreamAddr {
    type Err = DomainError;

    /// Parses `host[:port]`, defaulting the port to 53. Bare IPv6
    /// addresses are accepted without brackets; `[addr]:port` works for
    /// the bracketed form.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(DomainError::InvalidUpstreamAddr(s.to_string()));
        }
        if let Ok(addr) = s.parse::<SocketAddr>() {
            return Ok(UpstreamAddr::Resolved(addr));
        }
        if let Ok(ip) = s.parse::<IpAddr>() {
            return Ok(UpstreamAddr::Resolved(SocketAddr::new(ip, DEFAULT_DNS_PORT)));
        }
        match s.rsplit_once(':') {
            Some((host, port)) if !host.is_empty() => {
                let port = port
                    .parse::<u16>()
                    .map_err(|_| DomainError::InvalidUpstreamAddr(s.to_string()))?;
                Ok(UpstreamAddr::Unresolved {
                    hostname: host.to_string(),
                    port,
                })
            }
            _ => Ok(UpstreamAddr::Unresolved {
                hostname: s.to_string(),
                port: DEFAULT_DNS_PORT,
            }),
        }
    }
}

impl fmt::Display for UpstreamAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UpstreamAddr::Resolved(addr) => write!(f, "{}", addr),
            UpstreamAddr::Unresolved { hostname, port } => write!(f, "{}:{}", hostname, port),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_ipv4_defaults_to_port_53() {
        let addr: UpstreamAddr = "8.8.8.8".parse().unwrap();
        assert_eq!(addr.socket_addr().unwrap().to_string(), "8.8.8.8:53");
    }

    #[test]
    fn explicit_port_is_kept() {
        let addr: UpstreamAddr = "8.8.8.8:5353".parse().unwrap();
        assert_eq!(addr.socket_addr().unwrap().port(), 5353);
    }

    #[test]
    fn bare_ipv6_parses_without_brackets() {
        let addr: UpstreamAddr = "2001:4860:4860::8888".parse().unwrap();
        assert_eq!(addr.port(), 53);
        assert!(addr.socket_addr().is_some());
    }

    #[test]
    fn bracketed_ipv6_with_port_parses() {
        let addr: UpstreamAddr = "[2001:4860:4860::8888]:853".parse().unwrap();
        assert_eq!(addr.socket_addr().unwrap().port(), 853);
    }

    #[test]
    fn hostname_stays_unresolved() {
        let addr: UpstreamAddr = "bad.invalid:53".parse().unwrap();
        assert!(addr.is_unresolved());
        assert_eq!(addr.socket_addr(), None);
        assert_eq!(addr.to_string(), "bad.invalid:53");
    }

    #[test]
    fn empty_string_is_rejected() {
        assert!("".parse::<UpstreamAddr>().is_err());
    }

    #[test]
    fn bad_port_is_rejected() {
        assert!("ns.example:notaport".parse::<UpstreamAddr>().is_err());
    }
}
