//! Eventify Server - Main entry point
//!
//! Serves the REST and GraphQL API on `server.port` and the gRPC event
//! service on `server.grpc_port`.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;

use eventify_core::{
    api::{self, grpc::EventGrpcService, AppState},
    config::Config,
    db::Database,
    observability,
    rbac::roles,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = Config::load().context("Failed to load configuration")?;
    config.validate()?;

    observability::init(&config.observability)?;
    let metrics = observability::metrics::install(config.observability.metrics_enabled)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Eventify Server"
    );

    // Connect to database
    let db = Arc::new(Database::new(&config.database).await?);
    db.migrate().await?;
    tracing::info!("Database migrations applied");

    roles::seed_defaults(db.as_ref()).await?;
    tracing::info!("Default roles and permissions seeded");

    let state = AppState::new(&config.auth, db.clone(), db.clone(), db)?.with_metrics(metrics);

    let http_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port)
        .parse()
        .context("Invalid HTTP listen address")?;
    let grpc_addr: SocketAddr = format!("{}:{}", config.server.host, config.server.grpc_port)
        .parse()
        .context("Invalid gRPC listen address")?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // HTTP: REST + GraphQL
    let app = api::build_router(state.clone());
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    tracing::info!(address = %http_addr, "Starting HTTP server");
    let http = axum::serve(listener, app).with_graceful_shutdown(wait_for(shutdown_rx.clone()));

    // gRPC
    tracing::info!(address = %grpc_addr, "Starting gRPC server");
    let grpc = tonic::transport::Server::builder()
        .add_service(EventGrpcService::from_state(&state).into_server())
        .serve_with_shutdown(grpc_addr, wait_for(shutdown_rx));

    tokio::try_join!(
        async { http.await.context("HTTP server failed") },
        async { grpc.await.context("gRPC server failed") },
    )?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

async fn wait_for(mut rx: watch::Receiver<bool>) {
    while !*rx.borrow() {
        if rx.changed().await.is_err() {
            return;
        }
    }
}

/// Wait for shutdown signal.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
