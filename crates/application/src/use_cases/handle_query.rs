use crate::services::forwarder::Forwarder;
use crate::services::route_resolver::RouteResolver;
use crate::services::synthesizer::{self, Sections};
use hickory_proto::op::{Message, MessageType, OpCode, Query, ResponseCode};
use junction_dns_domain::{DomainError, RouteKind, RoutePolicy, Transport};
use std::future::Future;
use std::pin::Pin;
use tracing::{info, warn};

/// Bound on CNAME expansion re-entry. A chain this deep is either a
/// cycle between static records or broken configuration, so the query
/// fails closed instead of looping.
pub const MAX_CNAME_DEPTH: usize = 8;

/// A fully decided response. `compressible` marks replies that came
/// back from an upstream and should be name-compressed on the wire.
#[derive(Debug)]
pub struct RoutedResponse {
    pub message: Message,
    pub compressible: bool,
}

/// Per-query entry point: classifies the question, resolves the route
/// policy and produces the response via synthesis or forwarding.
pub struct HandleDnsQueryUseCase {
    resolver: RouteResolver,
    forwarder: Forwarder,
}

impl HandleDnsQueryUseCase {
    pub fn new(resolver: RouteResolver, forwarder: Forwarder) -> Self {
        Self {
            resolver,
            forwarder,
        }
    }

    /// Never fails: every malformed or unroutable query still yields a
    /// response message for the listener to send.
    pub async fn execute(&self, request: &Message, transport: Transport) -> RoutedResponse {
        match request.queries().len() {
            0 => {
                warn!(id = request.id(), "query carries no question");
                local_failure(request, ResponseCode::FormErr)
            }
            1 => self.handle_question(request, transport).await,
            n => {
                warn!(id = request.id(), questions = n, "multi-question queries are not implemented");
                local_failure(request, ResponseCode::NotImp)
            }
        }
    }

    async fn handle_question(&self, request: &Message, transport: Transport) -> RoutedResponse {
        let question = request.queries()[0].clone();
        info!(
            name = %question.name(),
            qtype = %question.query_type(),
            transport = %transport,
            "dns question received"
        );

        let policy = self.resolver.resolve(&question.name().to_utf8()).await;
        match policy.kind {
            RouteKind::Forwarding => {
                match self
                    .forwarder
                    .forward(&policy.nameservers, request, transport)
                    .await
                {
                    Ok(mut message) => {
                        // The id is only writable through the header.
                        let mut header = *message.header();
                        header.set_id(request.id());
                        message.set_header(header);
                        RoutedResponse {
                            message,
                            compressible: true,
                        }
                    }
                    Err(e) => {
                        warn!(name = %question.name(), error = %e, "forwarding failed");
                        match e {
                            // An empty nameserver list is our misconfiguration,
                            // not an upstream outage.
                            DomainError::NoNameservers => {
                                local_failure(request, ResponseCode::ServFail)
                            }
                            _ => upstream_failure(request),
                        }
                    }
                }
            }
            RouteKind::Static => {
                match self
                    .synthesize(&policy, &question, request.recursion_desired(), transport, 0)
                    .await
                {
                    Ok(sections) => RoutedResponse {
                        message: reply_with_sections(request, sections),
                        compressible: false,
                    },
                    Err(e) => {
                        warn!(name = %question.name(), error = %e, "static synthesis failed");
                        local_failure(request, ResponseCode::ServFail)
                    }
                }
            }
        }
    }

    /// Builds the sections for a static policy. Boxed because CNAME
    /// expansion re-enters the dispatch path recursively.
    fn synthesize<'a>(
        &'a self,
        policy: &'a RoutePolicy,
        question: &'a Query,
        recursion_desired: bool,
        transport: Transport,
        depth: usize,
    ) -> Pin<Box<dyn Future<Output = Result<Sections, DomainError>> + Send + 'a>> {
        Box::pin(async move {
            if depth > MAX_CNAME_DEPTH {
                return Err(DomainError::CnameChainTooDeep(question.name().to_utf8()));
            }

            let owner = question.name().clone();
            let qtype = question.query_type();
            let qclass = question.query_class();
            let mut sections = Sections::default();

            for addr in &policy.addresses {
                sections.append(qtype, synthesizer::address_record(&owner, qclass, *addr));
            }

            for target in &policy.cnames {
                let target_name = synthesizer::fqdn(target)?;
                sections.append(
                    qtype,
                    synthesizer::cname_record(&owner, target_name.clone(), qclass),
                );

                if recursion_desired {
                    let mut sub = Query::new();
                    sub.set_name(target_name);
                    sub.set_query_type(qtype);
                    sub.set_query_class(qclass);

                    let resolved = self.resolve_sub_question(sub, transport, depth + 1).await?;
                    for record in resolved.answers.iter().chain(resolved.additionals.iter()) {
                        sections.append(qtype, synthesizer::restamp(&owner, qclass, record));
                    }
                }
            }

            for group in &policy.txts {
                sections.append(qtype, synthesizer::txt_record(&owner, qclass, group));
            }

            Ok(sections)
        })
    }

    /// Full dispatch path for a synthetic sub-query spawned by CNAME
    /// expansion: same type and class as the original question, fresh
    /// message id, depth counter carried through.
    async fn resolve_sub_question(
        &self,
        question: Query,
        transport: Transport,
        depth: usize,
    ) -> Result<Sections, DomainError> {
        if depth > MAX_CNAME_DEPTH {
            return Err(DomainError::CnameChainTooDeep(question.name().to_utf8()));
        }

        let policy = self.resolver.resolve(&question.name().to_utf8()).await;
        match policy.kind {
            RouteKind::Forwarding => {
                let mut sub_request =
                    Message::new(fastrand::u16(..), MessageType::Query, OpCode::Query);
                sub_request.set_recursion_desired(true);
                sub_request.add_query(question);

                let response = self
                    .forwarder
                    .forward(&policy.nameservers, &sub_request, transport)
                    .await?;
                Ok(Sections {
                    answers: response.answers().to_vec(),
                    additionals: response.additionals().to_vec(),
                })
            }
            RouteKind::Static => self.synthesize(&policy, &question, true, transport, depth).await,
        }
    }
}

fn reply_message(request: &Message, code: ResponseCode) -> Message {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_response_code(code);
    for question in request.queries() {
        reply.add_query(question.clone());
    }
    reply
}

fn reply_with_sections(request: &Message, sections: Sections) -> Message {
    let mut message = reply_message(request, ResponseCode::NoError);
    for record in sections.answers {
        message.add_answer(record);
    }
    for record in sections.additionals {
        message.add_additional(record);
    }
    message
}

/// Locally synthesized failure: authoritative false, recursion
/// available true, no answer content.
fn local_failure(request: &Message, code: ResponseCode) -> RoutedResponse {
    let mut message = reply_message(request, code);
    message.set_authoritative(false);
    message.set_recursion_available(true);
    RoutedResponse {
        message,
        compressible: false,
    }
}

/// Upstream outage: plain SERVFAIL without the local-failure flag
/// treatment.
fn upstream_failure(request: &Message) -> RoutedResponse {
    RoutedResponse {
        message: reply_message(request, ResponseCode::ServFail),
        compressible: false,
    }
}
