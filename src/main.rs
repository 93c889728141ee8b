#[global_allocator]
static ALLOC: jemallocator::Jemalloc = jemallocator::Jemalloc;

use product_api::{AppError, Result, app, config::AppConfig};
use tracing::Level;

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .with_target(false)
        .init();

    let result = match AppConfig::from_env() {
        Ok(config) => run(config).await,
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!("product-api stopped: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: AppConfig) -> Result<()> {
    let app = app::build(&config).await?;

    let addr = config.server_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::InternalError(format!("bind {}: {}", addr, e)))?;

    tracing::info!("Serving /product on {}: {}", addr, config.summary());

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::InternalError(format!("server: {}", e)))?;

    tracing::info!("Server stopped, connections drained");
    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, draining connections");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, draining connections");
        },
    }
}
