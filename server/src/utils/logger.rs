// FICHIER : server/src/utils/logger.rs

use crate::utils::config::{AppConfig, PATH_LOGS};
use std::path::PathBuf;
use std::sync::Once;
use tracing_appender::rolling;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

// Sécurité pour éviter la double initialisation (crash fréquent en tests)
static INIT: Once = Once::new();

fn resolve_log_dir(config: Option<&AppConfig>) -> PathBuf {
    config
        .and_then(|c| c.get_path(PATH_LOGS))
        .unwrap_or_else(|| std::env::temp_dir().join("bookshelf").join("logs"))
}

pub fn init_logging() {
    INIT.call_once(|| {
        let config = AppConfig::get().ok();
        let log_dir = resolve_log_dir(config);
        let default_level = config
            .map(|c| c.core.log_level.clone())
            .unwrap_or_else(|| "info".to_string());

        std::fs::create_dir_all(&log_dir).ok();

        // =========================================================================
        // LAYER 1 : FICHIER (JSON, rotation quotidienne)
        // =========================================================================
        let file_appender = rolling::daily(&log_dir, "bookshelf.log");

        let file_layer = fmt::layer()
            .json()
            .with_writer(file_appender)
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true);

        // =========================================================================
        // LAYER 2 : CONSOLE (Pour l'Humain)
        // =========================================================================
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_level));

        let console_layer = fmt::layer()
            .compact()
            .with_target(false)
            .with_filter(env_filter);

        let registry = tracing_subscriber::registry()
            .with(file_layer)
            .with(console_layer);

        if registry.try_init().is_err() {
            tracing::warn!("⚠️ [Logger] Tentative de ré-initialisation ignorée (Global subscriber déjà actif).");
            return;
        }

        tracing::info!("🚀 Logger initialisé. Logs disponibles dans : {:?}", log_dir);
    });
}
