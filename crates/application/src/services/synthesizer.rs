//! Record construction and answer/additional classification for static
//! route policies.

use hickory_proto::rr::rdata::{A, AAAA, CNAME, TXT};
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use junction_dns_domain::DomainError;
use std::net::IpAddr;

/// Synthesized records carry no caching hint.
pub const SYNTH_TTL: u32 = 0;

/// Answer and additional sections accumulated while synthesizing a
/// response.
#[derive(Debug, Default)]
pub struct Sections {
    pub answers: Vec<Record>,
    pub additionals: Vec<Record>,
}

impl Sections {
    /// A record lands in the answer section when the question asked for
    /// its type (or for ANY); otherwise it is supporting material and
    /// goes to additionals. This keeps a CNAME out of the answer section
    /// of an address query while the chain's terminal A/AAAA records
    /// land in it.
    pub fn append(&mut self, qtype: RecordType, record: Record) {
        if qtype == RecordType::ANY || qtype == record.record_type() {
            self.answers.push(record);
        } else {
            self.additionals.push(record);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.answers.is_empty() && self.additionals.is_empty()
    }
}

/// Parses `name` into a fully-qualified hickory name.
pub fn fqdn(name: &str) -> Result<Name, DomainError> {
    let mut parsed = Name::from_utf8(name)
        .map_err(|e| DomainError::InvalidDomainName(format!("{}: {}", name, e)))?;
    parsed.set_fqdn(true);
    Ok(parsed)
}

/// A or AAAA record for `addr`, chosen by address family.
pub fn address_record(owner: &Name, qclass: DNSClass, addr: IpAddr) -> Record {
    let rdata = match addr {
        IpAddr::V4(v4) => RData::A(A(v4)),
        IpAddr::V6(v6) => RData::AAAA(AAAA(v6)),
    };
    stamped(owner, qclass, rdata)
}

pub fn cname_record(owner: &Name, target: Name, qclass: DNSClass) -> Record {
    stamped(owner, qclass, RData::CNAME(CNAME(target)))
}

/// One TXT record holding a group of character strings.
pub fn txt_record(owner: &Name, qclass: DNSClass, values: &[String]) -> Record {
    stamped(owner, qclass, RData::TXT(TXT::new(values.to_vec())))
}

/// Re-stamps a record spliced in from a recursive sub-resolution so it
/// carries the outer question's owner name, class and the synthesis TTL.
pub fn restamp(owner: &Name, qclass: DNSClass, record: &Record) -> Record {
    stamped(owner, qclass, record.data().clone())
}

fn stamped(owner: &Name, qclass: DNSClass, rdata: RData) -> Record {
    let mut record = Record::from_rdata(owner.clone(), SYNTH_TTL, rdata);
    record.set_dns_class(qclass);
    record
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owner() -> Name {
        fqdn("example.com").unwrap()
    }

    #[test]
    fn ipv4_becomes_a_record() {
        let record = address_record(&owner(), DNSClass::IN, "93.184.216.34".parse().unwrap());
        assert_eq!(record.record_type(), RecordType::A);
        assert_eq!(record.ttl(), 0);
        assert_eq!(record.name(), &owner());
    }

    #[test]
    fn ipv6_becomes_aaaa_record() {
        let record = address_record(&owner(), DNSClass::IN, "2606:2800:220:1::1".parse().unwrap());
        assert_eq!(record.record_type(), RecordType::AAAA);
    }

    #[test]
    fn matching_type_goes_to_answers() {
        let mut sections = Sections::default();
        let record = address_record(&owner(), DNSClass::IN, "1.2.3.4".parse().unwrap());
        sections.append(RecordType::A, record);
        assert_eq!(sections.answers.len(), 1);
        assert!(sections.additionals.is_empty());
    }

    #[test]
    fn mismatched_type_goes_to_additionals() {
        let mut sections = Sections::default();
        let record = address_record(&owner(), DNSClass::IN, "1.2.3.4".parse().unwrap());
        sections.append(RecordType::AAAA, record);
        assert!(sections.answers.is_empty());
        assert_eq!(sections.additionals.len(), 1);
    }

    #[test]
    fn any_query_takes_everything_as_answer() {
        let mut sections = Sections::default();
        sections.append(
            RecordType::ANY,
            address_record(&owner(), DNSClass::IN, "1.2.3.4".parse().unwrap()),
        );
        sections.append(
            RecordType::ANY,
            txt_record(&owner(), DNSClass::IN, &["v=spf1 -all".to_string()]),
        );
        assert_eq!(sections.answers.len(), 2);
        assert!(sections.additionals.is_empty());
    }

    #[test]
    fn fqdn_appends_root_label() {
        let name = fqdn("b.example").unwrap();
        assert!(name.is_fqdn());
    }

    #[test]
    fn restamp_rewrites_owner_and_ttl() {
        let inner_owner = fqdn("b.example").unwrap();
        let mut inner = Record::from_rdata(
            inner_owner,
            300,
            RData::A(A("1.2.3.4".parse().unwrap())),
        );
        inner.set_dns_class(DNSClass::IN);

        let outer = restamp(&owner(), DNSClass::IN, &inner);
        assert_eq!(outer.name(), &owner());
        assert_eq!(outer.ttl(), 0);
        assert_eq!(outer.record_type(), RecordType::A);
    }
}
