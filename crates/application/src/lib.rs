//! Junction DNS Application Layer
//!
//! Route resolution and response synthesis: the per-query engine that
//! decides between answering from configured records and forwarding
//! upstream. I/O happens behind the ports in [`ports`].
pub mod ports;
pub mod services;
pub mod use_cases;

pub use services::forwarder::Forwarder;
pub use services::route_resolver::RouteResolver;
pub use use_cases::handle_query::{HandleDnsQueryUseCase, RoutedResponse};
