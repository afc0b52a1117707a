// FICHIER : server/src/json_db/storage/mod.rs

pub mod cache;
pub mod file_storage;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

use crate::json_db::transactions::lock_manager::LockManager;

// --- CONFIGURATION ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonDbConfig {
    pub data_root: PathBuf,
}

impl JsonDbConfig {
    pub fn new(data_root: PathBuf) -> Self {
        Self { data_root }
    }

    pub fn db_root(&self, space: &str, db: &str) -> PathBuf {
        self.data_root.join(space).join(db)
    }

    pub fn db_collection_path(&self, space: &str, db: &str, collection: &str) -> PathBuf {
        self.db_root(space, db).join("collections").join(collection)
    }

    pub fn system_index_path(&self, space: &str, db: &str) -> PathBuf {
        self.db_root(space, db).join("_system.json")
    }

    pub fn wal_dir(&self, space: &str, db: &str) -> PathBuf {
        self.db_root(space, db).join("wal")
    }
}

// --- MOTEUR DE STOCKAGE ---

#[derive(Debug, Clone)]
pub struct StorageEngine {
    pub config: JsonDbConfig,
    pub cache: cache::Cache<String, Value>,
    pub locks: LockManager,
    // Sérialise les lectures-modifications de `_system.json`
    system_lock: Arc<Mutex<()>>,
}

fn cache_key(space: &str, db: &str, collection: &str, id: &str) -> String {
    format!("{}/{}/{}/{}", space, db, collection, id)
}

impl StorageEngine {
    pub fn new(config: JsonDbConfig) -> Self {
        Self {
            config,
            cache: cache::Cache::new(1000, None),
            locks: LockManager::new(),
            system_lock: Arc::new(Mutex::new(())),
        }
    }

    /// Écrit un document (Disque atomique + Cache)
    pub async fn write_document(
        &self,
        space: &str,
        db: &str,
        collection: &str,
        id: &str,
        doc: &Value,
    ) -> Result<()> {
        file_storage::write_document(&self.config, space, db, collection, id, doc).await?;
        self.cache
            .put(cache_key(space, db, collection, id), doc.clone());
        Ok(())
    }

    /// Lit un document (Cache Hit d'abord, sinon Disque)
    pub async fn read_document(
        &self,
        space: &str,
        db: &str,
        collection: &str,
        id: &str,
    ) -> Result<Option<Value>> {
        let key = cache_key(space, db, collection, id);

        if let Some(doc) = self.cache.get(&key) {
            return Ok(Some(doc));
        }

        let doc_opt = file_storage::read_document(&self.config, space, db, collection, id).await?;
        if let Some(doc) = &doc_opt {
            self.cache.put(key, doc.clone());
        }

        Ok(doc_opt)
    }

    /// Supprime un document (Disque + Cache). Renvoie `true` si un fichier existait.
    pub async fn delete_document(
        &self,
        space: &str,
        db: &str,
        collection: &str,
        id: &str,
    ) -> Result<bool> {
        let existed = file_storage::delete_document(&self.config, space, db, collection, id).await?;
        self.cache.remove(&cache_key(space, db, collection, id));
        Ok(existed)
    }

    /// Verrou exclusif sur l'index système de la base
    pub async fn lock_system_index(&self) -> MutexGuard<'_, ()> {
        self.system_lock.lock().await
    }
}
