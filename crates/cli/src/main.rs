use clap::Parser;
use junction_dns_application::{Forwarder, HandleDnsQueryUseCase, RouteResolver};
use junction_dns_infrastructure::{NetUpstreamExchange, SqliteRouteStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;

mod bootstrap;
mod server;

#[derive(Parser)]
#[command(name = "junction-dns")]
#[command(version)]
#[command(about = "Policy-routed DNS responder: static answers or upstream forwarding per domain")]
struct Cli {
    /// DNS listener port (UDP and TCP)
    #[arg(short = 'd', long, default_value_t = 53)]
    dns_port: u16,

    /// Configuration API port
    #[arg(short = 'w', long, default_value_t = 8080)]
    web_port: u16,

    /// Bind address for all listeners
    #[arg(short = 'b', long, default_value = "0.0.0.0")]
    bind: String,

    /// Route database path
    #[arg(long, default_value = "routes.db")]
    database: String,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    bootstrap::init_logging(&cli.log_level);
    info!("starting junction-dns v{}", env!("CARGO_PKG_VERSION"));

    let pool = bootstrap::init_database(&format!("sqlite:{}", cli.database)).await?;
    let store = Arc::new(SqliteRouteStore::new(pool));

    let dispatcher = Arc::new(HandleDnsQueryUseCase::new(
        RouteResolver::new(store.clone()),
        Forwarder::new(Arc::new(NetUpstreamExchange)),
    ));

    let dns_addr: SocketAddr = format!("{}:{}", cli.bind, cli.dns_port).parse()?;
    let web_addr: SocketAddr = format!("{}:{}", cli.bind, cli.web_port).parse()?;

    server::run(dns_addr, web_addr, dispatcher, store).await
}
