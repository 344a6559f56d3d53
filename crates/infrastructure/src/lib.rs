//! Junction DNS Infrastructure Layer
//!
//! Adapters behind the application ports: the SQLite route store, the
//! UDP/TCP upstream exchange, and the DNS listener loops.
pub mod dns;
pub mod store;

pub use dns::listener::{serve_tcp, serve_udp};
pub use dns::upstream::NetUpstreamExchange;
pub use store::sqlite::SqliteRouteStore;
pub use store::{create_pool, init_schema};
