// FICHIER : server/src/lib.rs

pub mod catalog;
pub mod editor;
pub mod json_db;
pub mod revisions;
pub mod routes;
pub mod search;
pub mod utils;

use crate::catalog::{CollectionRepository, CollectionService};
use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::storage::{JsonDbConfig, StorageEngine};
use crate::json_db::transactions::TransactionManager;
use crate::revisions::RevisionStore;
use crate::routes::templates::PageRenderer;
use crate::search::SearchIndexer;
use crate::utils::{AppConfig, AppError, Result};
use std::sync::Arc;

// État partagé par toutes les requêtes (derrière un Arc)
pub struct AppState {
    pub config: AppConfig,
    pub storage: StorageEngine,
    pub indexer: Arc<dyn SearchIndexer>,
    pub pages: PageRenderer,
}

impl AppState {
    /// Ouvre la base, rejoue le WAL et choisit l'indexeur selon la configuration.
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        let storage = StorageEngine::new(JsonDbConfig::new(config.domain_root()?));
        let indexer = search::build_indexer(&config, &storage)?;
        Self::with_indexer(config, storage, indexer).await
    }

    pub async fn with_indexer(
        config: AppConfig,
        storage: StorageEngine,
        indexer: Arc<dyn SearchIndexer>,
    ) -> Result<Self> {
        let manager = CollectionsManager::new(&storage, &config.database.space, &config.database.db);
        manager.init_db().await.map_err(AppError::persistence)?;

        let recovered = TransactionManager::new(&manager)
            .recover()
            .await
            .map_err(AppError::persistence)?;
        if recovered > 0 {
            tracing::warn!("🩹 {} transaction(s) interrompue(s) traitée(s)", recovered);
        }

        Ok(Self {
            pages: PageRenderer::new()?,
            config,
            storage,
            indexer,
        })
    }

    pub fn collections(&self) -> CollectionService<'_> {
        let repo = CollectionRepository::new(
            &self.storage,
            &self.config.database.space,
            &self.config.database.db,
        );
        CollectionService::new(repo, self.indexer.as_ref())
    }

    pub fn revisions(&self) -> RevisionStore<'_> {
        RevisionStore::new(
            &self.storage,
            &self.config.database.space,
            &self.config.database.db,
        )
    }
}
