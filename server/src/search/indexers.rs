// FICHIER : server/src/search/indexers.rs

use super::projection::SearchProjection;
use super::SearchIndexer;
use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::storage::StorageEngine;
use crate::utils::net_client::put_json;
use crate::utils::prelude::*;

pub const SEARCH_INDEX_TABLE: &str = "search_index";

// --- ELASTICSEARCH ---

pub struct ElasticsearchIndexer {
    base_url: String,
    index: String,
}

impl ElasticsearchIndexer {
    pub fn new(url: &str, index: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
            index: index.to_string(),
        }
    }

    pub fn document_url(&self, bbid: &str) -> String {
        format!("{}/{}/_doc/{}", self.base_url, self.index, bbid)
    }
}

#[async_trait]
impl SearchIndexer for ElasticsearchIndexer {
    fn name(&self) -> &'static str {
        "elasticsearch"
    }

    async fn index_entity(&self, projection: &SearchProjection) -> Result<Value> {
        let url = self.document_url(&projection.bbid);
        let response = put_json(&url, projection)
            .await
            .map_err(|e| AppError::Indexing(e.to_string()))?;
        debug!(bbid = %projection.bbid, result = %response["result"], "🔎 Document indexé");
        Ok(serde_json::to_value(projection)?)
    }
}

// --- JSON DB ---

/// Index local : les projections sont stockées dans la table `search_index`.
pub struct JsonDbIndexer {
    storage: StorageEngine,
    space: String,
    db: String,
}

impl JsonDbIndexer {
    pub fn new(storage: StorageEngine, space: &str, db: &str) -> Self {
        Self {
            storage,
            space: space.to_string(),
            db: db.to_string(),
        }
    }
}

#[async_trait]
impl SearchIndexer for JsonDbIndexer {
    fn name(&self) -> &'static str {
        "jsondb"
    }

    async fn index_entity(&self, projection: &SearchProjection) -> Result<Value> {
        let doc = serde_json::to_value(projection)?;
        let manager = CollectionsManager::new(&self.storage, &self.space, &self.db);
        manager
            .insert_raw(SEARCH_INDEX_TABLE, &doc)
            .await
            .map_err(|e| AppError::Indexing(format!("{:#}", e)))?;
        Ok(doc)
    }
}

// --- DÉSACTIVÉ ---

pub struct DisabledIndexer;

#[async_trait]
impl SearchIndexer for DisabledIndexer {
    fn name(&self) -> &'static str {
        "disabled"
    }

    async fn index_entity(&self, projection: &SearchProjection) -> Result<Value> {
        Ok(serde_json::to_value(projection)?)
    }
}
