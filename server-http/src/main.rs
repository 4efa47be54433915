use server_http::{build_router, AppState};
use shared::config::Config;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    info!("Starting Movie Monster HTTP Server...");

    // Load environment variables from .env file (if exists)
    match dotenvy::dotenv() {
        Ok(_) => info!("Loaded environment variables from .env file"),
        Err(_) => info!("No .env file found, using system environment variables"),
    }

    let config = Arc::new(Config::from_env());

    if let Err(e) = std::fs::create_dir_all(&config.poster_dir) {
        warn!("Failed to create poster directory {}: {}", config.poster_dir, e);
    }

    let state = match AppState::from_config(config.clone()) {
        Ok(state) => state,
        Err(e) => {
            error!("Failed to initialize server state: {}", e);
            std::process::exit(1);
        }
    };

    if !config.fatal_transport_errors {
        warn!("Metadata API transport errors will be answered with empty responses instead of exiting");
    }

    let poster_tasks = state.poster_tasks.clone();
    let router = build_router(state);

    let addr = config.listen_addr();
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Error starting server: {}", e);
            std::process::exit(1);
        }
    };

    info!("HTTP Server listening on http://{}", addr);
    info!("Metadata API: {}", config.api_url_prefix);
    info!("Image host:   {}", config.image_url_prefix);
    info!("Try: curl http://localhost:{}/movie/500", config.http_port);

    // Graceful shutdown handler
    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        std::process::exit(1);
    }

    poster_tasks.close();
    if !poster_tasks.is_empty() {
        info!("Waiting for {} poster download(s) to finish", poster_tasks.len());
    }
    poster_tasks.wait().await;

    info!("Server closed");
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            info!("Received terminate signal");
        },
    }

    info!("Shutting down gracefully...");
}
