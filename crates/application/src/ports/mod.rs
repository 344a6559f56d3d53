pub mod route_store;
pub mod upstream;

pub use route_store::RouteStore;
pub use upstream::UpstreamExchange;
