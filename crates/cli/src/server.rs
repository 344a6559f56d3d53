use anyhow::anyhow;
use junction_dns_api::{create_api_routes, AppState};
use junction_dns_application::HandleDnsQueryUseCase;
use junction_dns_infrastructure::{serve_tcp, serve_udp, SqliteRouteStore};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::task::JoinSet;
use tracing::info;

/// Runs the UDP DNS, TCP DNS and configuration-API listeners as
/// independent tasks until one fails or a shutdown signal arrives.
pub async fn run(
    dns_addr: SocketAddr,
    web_addr: SocketAddr,
    dispatcher: Arc<HandleDnsQueryUseCase>,
    store: Arc<SqliteRouteStore>,
) -> anyhow::Result<()> {
    let mut tasks: JoinSet<anyhow::Result<()>> = JoinSet::new();

    let udp_dispatcher = dispatcher.clone();
    tasks.spawn(async move { serve_udp(dns_addr, udp_dispatcher).await.map_err(Into::into) });

    let tcp_dispatcher = dispatcher;
    tasks.spawn(async move { serve_tcp(dns_addr, tcp_dispatcher).await.map_err(Into::into) });

    tasks.spawn(async move {
        let router = create_api_routes(AppState { routes: store });
        let listener = tokio::net::TcpListener::bind(web_addr).await?;
        info!(addr = %web_addr, "configuration api ready");
        axum::serve(listener, router).await?;
        Ok(())
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
            tasks.shutdown().await;
            Ok(())
        }
        Some(finished) = tasks.join_next() => {
            match finished {
                Ok(Ok(())) => Err(anyhow!("listener exited unexpectedly")),
                Ok(Err(e)) => Err(e),
                Err(e) => Err(anyhow!(e)),
            }
        }
    }
}
