// FICHIER : server/src/utils/config.rs

use crate::utils::env as app_env;
use crate::utils::error::{AppError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Singleton global pour la configuration
static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Constantes Système (Single Source of Truth)
pub const DEFAULT_SPACE: &str = "bookshelf";
pub const DEFAULT_DB: &str = "main";
pub const PATH_DOMAIN: &str = "PATH_BOOKSHELF_DOMAIN";
pub const PATH_LOGS: &str = "PATH_BOOKSHELF_LOGS";

/// Configuration globale du service
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub name: Option<String>,

    pub core: CoreConfig,

    // Gestion transparente de la conversion Liste -> Map via Serde
    #[serde(deserialize_with = "deserialize_paths_flexible")]
    pub paths: HashMap<String, String>,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub revisions: RevisionsConfig,
}

// --- HELPERS SERDE ---

fn deserialize_paths_flexible<'de, D>(
    deserializer: D,
) -> std::result::Result<HashMap<String, String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v: Value = Deserialize::deserialize(deserializer)?;

    if let Some(map) = v.as_object() {
        let mut paths = HashMap::new();
        for (key, val) in map {
            if let Some(s) = val.as_str() {
                paths.insert(key.clone(), s.to_string());
            }
        }
        Ok(paths)
    } else if let Some(arr) = v.as_array() {
        let mut paths = HashMap::new();
        for item in arr {
            let id = item.get("id").and_then(|v| v.as_str());
            let val = item.get("value").and_then(|v| v.as_str());
            if let (Some(k), Some(v)) = (id, val) {
                paths.insert(k.to_string(), v.to_string());
            }
        }
        Ok(paths)
    } else {
        Err(serde::de::Error::custom(
            "Format de 'paths' invalide : attendu Map ou Liste",
        ))
    }
}

// --- SOUS-STRUCTURES DE CONFIGURATION ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CoreConfig {
    pub env_mode: String,
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Active `dev` dans le gabarit HTML (scripts non minifiés)
    #[serde(default)]
    pub dev: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatabaseConfig {
    pub space: String,
    pub db: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchProvider {
    Elasticsearch,
    Jsondb,
    Disabled,
}

#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct SearchConfig {
    pub provider: SearchProvider,
    pub url: Option<String>,
    pub index: String,
}

// L'URL peut contenir des identifiants : on ne l'affiche pas
impl std::fmt::Debug for SearchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchConfig")
            .field("provider", &self.provider)
            .field("index", &self.index)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RevisionsConfig {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

// --- IMPLÉMENTATION PRINCIPALE ---

impl AppConfig {
    pub fn init() -> Result<()> {
        if CONFIG.get().is_some() {
            return Ok(());
        }

        let target_env = if cfg!(test) || env::var("BOOKSHELF_ENV_MODE").as_deref() == Ok("test")
        {
            "test".to_string()
        } else if let Ok(env_override) = env::var("BOOKSHELF_ENV_MODE") {
            env_override
        } else if cfg!(debug_assertions) {
            "development".to_string()
        } else {
            "production".to_string()
        };

        let mut config = if target_env == "test" {
            Self::create_default_test_config()
        } else {
            Self::load_from_file(&target_env)?
        };
        config.apply_env_overrides()?;

        if CONFIG.set(config).is_err() {
            tracing::warn!("⚠️ [Config] Initialisation concurrente ignorée");
        }

        Ok(())
    }

    pub fn get() -> Result<&'static AppConfig> {
        CONFIG.get().ok_or_else(|| {
            AppError::Config("AppConfig non initialisé ! Appelez AppConfig::init() au démarrage.".into())
        })
    }

    pub fn get_path(&self, id: &str) -> Option<PathBuf> {
        self.paths.get(id).map(PathBuf::from)
    }

    /// Racine des données (obligatoire)
    pub fn domain_root(&self) -> Result<PathBuf> {
        self.get_path(PATH_DOMAIN).ok_or_else(|| {
            AppError::Config(format!("{} est introuvable dans la configuration", PATH_DOMAIN))
        })
    }

    fn config_file_candidates() -> Vec<PathBuf> {
        let mut candidates = Vec::new();
        if let Some(explicit) = app_env::get_optional("BOOKSHELF_CONFIG") {
            candidates.push(PathBuf::from(explicit));
        }
        if let Some(dir) = dirs::config_dir() {
            candidates.push(dir.join("bookshelf").join("config.json"));
        }
        candidates.push(PathBuf::from("config/bookshelf.json"));
        candidates
    }

    fn load_from_file(env_mode: &str) -> Result<Self> {
        let Some(path) = Self::config_file_candidates()
            .into_iter()
            .find(|p| p.exists())
        else {
            tracing::info!(
                "ℹ️ [Config] Aucun fichier trouvé, configuration par défaut ({})",
                env_mode
            );
            return Ok(Self::create_default_config(env_mode));
        };

        let content = fs::read_to_string(&path).map_err(|e| {
            AppError::Config(format!("Lecture impossible de {:?} : {}", path, e))
        })?;

        let mut config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            AppError::Config(format!("Configuration invalide dans {:?} : {}", path, e))
        })?;
        config.core.env_mode = env_mode.to_string();
        Ok(config)
    }

    fn apply_env_overrides(&mut self) -> Result<()> {
        if app_env::get_optional("BOOKSHELF_PORT").is_some() {
            self.server.port = app_env::get_parsed("BOOKSHELF_PORT")?;
        }
        if let Some(url) = app_env::get_optional("BOOKSHELF_SEARCH_URL") {
            self.search.url = Some(url);
        }
        if let Some(root) = app_env::get_optional(PATH_DOMAIN) {
            self.paths.insert(PATH_DOMAIN.to_string(), root);
        }
        Ok(())
    }

    fn create_default_config(env_mode: &str) -> Self {
        let base = dirs::data_dir()
            .unwrap_or_else(env::temp_dir)
            .join("bookshelf");

        let mut paths = HashMap::new();
        paths.insert(
            PATH_DOMAIN.to_string(),
            base.join("domain").to_string_lossy().to_string(),
        );
        paths.insert(
            PATH_LOGS.to_string(),
            base.join("logs").to_string_lossy().to_string(),
        );

        AppConfig {
            name: Some("Bookshelf".to_string()),
            core: CoreConfig {
                env_mode: env_mode.to_string(),
                log_level: "info".to_string(),
            },
            paths,
            server: ServerConfig::default(),
            database: DatabaseConfig::default(),
            search: SearchConfig::default(),
            revisions: RevisionsConfig::default(),
        }
    }

    pub fn create_default_test_config() -> Self {
        let tmp = env::temp_dir().join(format!("bookshelf_test_{}", std::process::id()));

        let mut paths = HashMap::new();
        paths.insert(
            PATH_DOMAIN.to_string(),
            tmp.join("domain").to_string_lossy().to_string(),
        );
        paths.insert(
            PATH_LOGS.to_string(),
            tmp.join("logs").to_string_lossy().to_string(),
        );

        AppConfig {
            name: Some("Default Test Config".to_string()),
            core: CoreConfig {
                env_mode: "test".to_string(),
                log_level: "debug".to_string(),
            },
            paths,
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                dev: true,
            },
            database: DatabaseConfig::default(),
            search: SearchConfig {
                provider: SearchProvider::Jsondb,
                url: None,
                index: "bookshelf".to_string(),
            },
            revisions: RevisionsConfig::default(),
        }
    }
}

// --- IMPLÉMENTATIONS PAR DÉFAUT ---

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 9099,
            dev: cfg!(debug_assertions),
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            space: DEFAULT_SPACE.to_string(),
            db: DEFAULT_DB.to_string(),
        }
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: SearchProvider::Jsondb,
            url: None,
            index: "bookshelf".to_string(),
        }
    }
}

impl Default for RevisionsConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

// --- TESTS UNITAIRES ---
