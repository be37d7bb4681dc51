use anyhow::Result;
use dotenvy::dotenv;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use rto_registry::config::environment::EnvironmentConfig;
use rto_registry::database;
use rto_registry::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = EnvironmentConfig::from_env();

    let level = if config.is_development() {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    info!("🚗 RTO Vehicle Registry API");
    info!("===========================");

    let pool = match database::create_pool(None).await {
        Ok(pool) => {
            info!("✅ Database connected");
            pool
        }
        Err(e) => {
            error!("❌ Error connecting to the database: {}", e);
            return Err(anyhow::anyhow!("Database error: {}", e));
        }
    };

    database::run_migrations(&pool).await?;

    let addr: SocketAddr = config.server_url().parse()?;
    let app = rto_registry::app(AppState::new(pool, config));

    info!("🌐 Server starting on http://{}", addr);
    info!("🔑 POST /api/auth/login - Admin login");
    info!("🚚 Endpoints - Vehicles:");
    info!("   GET    /api/vehicles - List vehicles");
    info!("   POST   /api/vehicles - Add vehicle (JSON or multipart with licensePdf)");
    info!("   PUT    /api/vehicles/:id - Update vehicle");
    info!("   DELETE /api/vehicles/:id - Delete vehicle");
    info!("   GET    /api/vehicles/:id/license - Stream license PDF");
    info!("🪪 Endpoints - Licenses:");
    info!("   GET    /api/licenses - List licenses");
    info!("   POST   /api/licenses - Add license");
    info!("   PUT    /api/licenses/:id - Update license");
    info!("   DELETE /api/licenses/:id - Delete license");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Server error: {}", e);
            e
        })?;

    info!("👋 Server stopped");
    Ok(())
}

/// Graceful shutdown on Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Ctrl+C received, shutting down...");
        },
        _ = terminate => {
            info!("🛑 Termination signal received, shutting down...");
        },
    }
}
