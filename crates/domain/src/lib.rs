//! Junction DNS Domain Layer
pub mod errors;
pub mod route;
pub mod transport;
pub mod upstream;

pub use errors::DomainError;
pub use route::{canonical_key, parent_suffix, RouteKind, RoutePolicy, ROOT_KEY};
pub use transport::Transport;
pub use upstream::UpstreamAddr;
