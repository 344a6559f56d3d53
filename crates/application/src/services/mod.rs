pub mod forwarder;
pub mod route_resolver;
pub mod synthesizer;
