use junction_dns_application::ports::RouteStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub routes: Arc<dyn RouteStore>,
}
