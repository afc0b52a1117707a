// FICHIER : server/src/search/mod.rs

pub mod indexers;
pub mod projection;

use crate::json_db::storage::StorageEngine;
use crate::utils::config::{AppConfig, SearchProvider};
use crate::utils::prelude::*;
use std::sync::Arc;

pub use indexers::{DisabledIndexer, ElasticsearchIndexer, JsonDbIndexer};
pub use projection::SearchProjection;

/// Opération unique "indexer une entité". Pas de retry : l'échec remonte en `Indexing`.
#[async_trait]
pub trait SearchIndexer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Renvoie la projection indexée.
    async fn index_entity(&self, projection: &SearchProjection) -> Result<Value>;
}

/// Choisit l'implémentation selon `search.provider`.
pub fn build_indexer(config: &AppConfig, storage: &StorageEngine) -> Result<Arc<dyn SearchIndexer>> {
    let search = &config.search;
    let indexer: Arc<dyn SearchIndexer> = match search.provider {
        SearchProvider::Elasticsearch => {
            let url = search.url.as_deref().ok_or_else(|| {
                AppError::Config("search.url est requis pour le fournisseur elasticsearch".into())
            })?;
            Arc::new(ElasticsearchIndexer::new(url, &search.index))
        }
        SearchProvider::Jsondb => Arc::new(JsonDbIndexer::new(
            storage.clone(),
            &config.database.space,
            &config.database.db,
        )),
        SearchProvider::Disabled => Arc::new(DisabledIndexer),
    };
    info!("🔎 Indexeur de recherche : {}", indexer.name());
    Ok(indexer)
}
