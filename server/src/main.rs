// FICHIER : server/src/main.rs

use bookshelf::utils::config::AppConfig;
use bookshelf::utils::init_logging;
use bookshelf::{routes, AppState};
use std::sync::Arc;

#[tokio::main]
async fn main() {
    if let Err(e) = AppConfig::init() {
        eprintln!("❌ Erreur fatale de configuration : {}", e);
        std::process::exit(1);
    }
    init_logging();

    if let Err(e) = run().await {
        tracing::error!("❌ Arrêt du service : {}", e);
        std::process::exit(1);
    }
}

async fn run() -> bookshelf::utils::Result<()> {
    let config = AppConfig::get()?.clone();
    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!(
        env = %config.core.env_mode,
        search = ?config.search,
        "🚀 Démarrage de Bookshelf"
    );

    let state = Arc::new(AppState::bootstrap(config).await?);
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("📡 Écoute sur http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("👋 Service arrêté");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("⚠️ Signal d'arrêt indisponible : {}", e);
    }
}
