use actor_framework::tracing::setup_tracing;
use bookstore_orders::api::{self, AppState};
use bookstore_orders::config::Config;
use bookstore_orders::lifecycle::OrderSystem;
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    setup_tracing();

    let config = Config::from_env();
    info!(?config, "Starting bookstore order service");

    let system = OrderSystem::start(&config);
    if let Some(path) = &config.catalog_seed_path {
        if let Err(e) = system.seed_catalog(path).await {
            error!(error = %e, "Catalog seed failed");
            system.shutdown().await?;
            return Err(e.to_string());
        }
    }

    let app = api::router(AppState::new(&system));
    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| format!("Cannot bind {addr}: {e}"))?;
    info!(%addr, "Listening");

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                error!(error = %e, "Cannot listen for shutdown signal");
                std::future::pending::<()>().await;
            }
            info!("Shutdown signal received");
        })
        .await;

    // The router and its state are gone once serve returns, so the actors can drain.
    system.shutdown().await?;
    served.map_err(|e| format!("Server error: {e}"))
}
