#![allow(dead_code)]

use async_trait::async_trait;
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use hickory_proto::rr::rdata::A;
use hickory_proto::rr::{DNSClass, Name, RData, Record, RecordType};
use junction_dns_application::ports::{RouteStore, UpstreamExchange};
use junction_dns_domain::{DomainError, RouteKind, RoutePolicy, Transport, UpstreamAddr};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::{Mutex, RwLock};
use std::time::Duration;

// ── route store mock ───────────────────────────────────────────────────────

pub struct MockRouteStore {
    routes: RwLock<HashMap<String, RoutePolicy>>,
    failing_keys: RwLock<HashSet<String>>,
}

impl MockRouteStore {
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
            failing_keys: RwLock::new(HashSet::new()),
        }
    }

    pub fn insert(&self, policy: RoutePolicy) {
        self.routes
            .write()
            .unwrap()
            .insert(policy.domain.clone(), policy);
    }

    /// Makes every `get` for `key` fail with a storage error.
    pub fn fail_key(&self, key: &str) {
        self.failing_keys.write().unwrap().insert(key.to_string());
    }
}

#[async_trait]
impl RouteStore for MockRouteStore {
    async fn get(&self, key: &str) -> Result<Option<RoutePolicy>, DomainError> {
        if self.failing_keys.read().unwrap().contains(key) {
            return Err(DomainError::Storage(format!("injected failure for {}", key)));
        }
        Ok(self.routes.read().unwrap().get(key).cloned())
    }

    async fn put(&self, policy: &RoutePolicy) -> Result<(), DomainError> {
        self.insert(policy.clone());
        Ok(())
    }

    async fn list(&self) -> Result<Vec<RoutePolicy>, DomainError> {
        let mut all: Vec<RoutePolicy> = self.routes.read().unwrap().values().cloned().collect();
        all.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(all)
    }
}

// ── upstream exchange mock ─────────────────────────────────────────────────

pub struct MockUpstreamExchange {
    answers: RwLock<HashMap<String, Vec<Record>>>,
    failing: RwLock<HashSet<String>>,
    calls: Mutex<Vec<(String, Transport)>>,
}

impl MockUpstreamExchange {
    pub fn new() -> Self {
        Self {
            answers: RwLock::new(HashMap::new()),
            failing: RwLock::new(HashSet::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// `server` is the `host:port` form the forwarder hands to the
    /// exchange; hostnames work as keys too.
    pub fn answer_with(&self, server: &str, records: Vec<Record>) {
        self.answers
            .write()
            .unwrap()
            .insert(server.to_string(), records);
    }

    pub fn fail(&self, server: &str) {
        self.failing.write().unwrap().insert(server.to_string());
    }

    pub fn calls(&self) -> Vec<(String, Transport)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UpstreamExchange for MockUpstreamExchange {
    async fn exchange(
        &self,
        payload: &[u8],
        server: &UpstreamAddr,
        transport: Transport,
        _timeout: Duration,
    ) -> Result<Message, DomainError> {
        let server = server.to_string();
        self.calls.lock().unwrap().push((server.clone(), transport));

        if self.failing.read().unwrap().contains(&server) {
            return Err(DomainError::UpstreamIo {
                server,
                detail: "injected failure".to_string(),
            });
        }

        let records = self
            .answers
            .read()
            .unwrap()
            .get(&server)
            .cloned()
            .ok_or_else(|| DomainError::UpstreamIo {
                server,
                detail: "no answer configured".to_string(),
            })?;

        let request = Message::from_vec(payload)
            .map_err(|e| DomainError::MessageDecode(e.to_string()))?;

        // The reply id is deliberately off so callers that need the
        // client's id must re-stamp it themselves.
        let mut reply = Message::new(
            request.id().wrapping_add(1),
            MessageType::Response,
            OpCode::Query,
        );
        reply.set_recursion_desired(request.recursion_desired());
        reply.set_recursion_available(true);
        reply.set_response_code(ResponseCode::NoError);
        for question in request.queries() {
            reply.add_query(question.clone());
        }
        for record in records {
            reply.add_answer(record);
        }
        Ok(reply)
    }
}

// ── builders ───────────────────────────────────────────────────────────────

pub fn static_policy(domain: &str) -> RoutePolicy {
    RoutePolicy {
        domain: domain.to_string(),
        kind: RouteKind::Static,
        active: true,
        nameservers: Vec::new(),
        addresses: Vec::new(),
        cnames: Vec::new(),
        txts: Vec::new(),
    }
}

pub fn forwarding_policy(domain: &str, nameservers: &[&str]) -> RoutePolicy {
    RoutePolicy {
        domain: domain.to_string(),
        kind: RouteKind::Forwarding,
        active: true,
        nameservers: nameservers.iter().map(|s| s.to_string()).collect(),
        addresses: Vec::new(),
        cnames: Vec::new(),
        txts: Vec::new(),
    }
}

pub fn query_message(name: &str, qtype: RecordType, recursion_desired: bool) -> Message {
    let mut question = Query::new();
    question.set_name(Name::from_str(name).unwrap());
    question.set_query_type(qtype);
    question.set_query_class(DNSClass::IN);

    let mut message = Message::new(0x1234, MessageType::Query, OpCode::Query);
    message.set_recursion_desired(recursion_desired);
    message.add_query(question);
    message
}

pub fn a_record(owner: &str, ttl: u32, addr: &str) -> Record {
    let mut record = Record::from_rdata(
        Name::from_str(owner).unwrap(),
        ttl,
        RData::A(A(addr.parse().unwrap())),
    );
    record.set_dns_class(DNSClass::IN);
    record
}
