// FICHIER : server/src/json_db/collections/manager.rs

use crate::json_db::storage::{file_storage, StorageEngine};

use anyhow::{anyhow, Context, Result};
use chrono::Utc;
use serde_json::{json, Value};
use uuid::Uuid;

use super::collection;

#[derive(Debug)]
pub struct CollectionsManager<'a> {
    pub storage: &'a StorageEngine,
    pub space: String,
    pub db: String,
}

impl<'a> CollectionsManager<'a> {
    pub fn new(storage: &'a StorageEngine, space: &str, db: &str) -> Self {
        Self {
            storage,
            space: space.to_string(),
            db: db.to_string(),
        }
    }

    pub async fn init_db(&self) -> Result<()> {
        file_storage::create_db(&self.storage.config, &self.space, &self.db).await?;
        let _guard = self.storage.lock_system_index().await;
        let doc = self.load_system_index().await?;
        self.save_system_index(doc).await
    }

    // --- MÉTHODES DE LECTURE ---

    pub async fn get_document(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.storage
            .read_document(&self.space, &self.db, collection, id)
            .await
            .with_context(|| format!("Lecture de {}/{}", collection, id))
    }

    pub async fn get(&self, collection: &str, id: &str) -> Result<Option<Value>> {
        self.get_document(collection, id).await
    }

    pub async fn list_all(&self, collection: &str) -> Result<Vec<Value>> {
        collection::list_documents(&self.storage.config, &self.space, &self.db, collection).await
    }

    // --- GESTION INDEX SYSTÈME ---

    async fn load_system_index(&self) -> Result<Value> {
        let sys_path = self
            .storage
            .config
            .system_index_path(&self.space, &self.db);
        if !sys_path.exists() {
            return Ok(json!({
                "space": self.space,
                "database": self.db,
                "version": 1,
                "collections": {}
            }));
        }
        let content = tokio::fs::read_to_string(&sys_path).await?;
        serde_json::from_str(&content).context("Index _system.json illisible")
    }

    async fn save_system_index(&self, mut doc: Value) -> Result<()> {
        let now = Utc::now().to_rfc3339();
        if let Some(obj) = doc.as_object_mut() {
            obj.entry("id")
                .or_insert_with(|| Value::String(Uuid::new_v4().to_string()));
            obj.entry("createdAt")
                .or_insert_with(|| Value::String(now.clone()));
            obj.insert("updatedAt".to_string(), Value::String(now));
        }
        let sys_path = self
            .storage
            .config
            .system_index_path(&self.space, &self.db);
        file_storage::atomic_write(&sys_path, serde_json::to_string_pretty(&doc)?.as_bytes())
            .await
    }

    // --- GESTION DES COLLECTIONS ---

    pub async fn create_collection(&self, name: &str) -> Result<()> {
        if name.is_empty() || name.contains(['/', '\\', '.']) {
            return Err(anyhow!("Nom de collection invalide : '{}'", name));
        }

        let _guard = self.storage.lock_system_index().await;

        let col_path = collection::collection_root(&self.storage.config, &self.space, &self.db, name);
        let meta_path = col_path.join("_meta.json");
        if meta_path.exists() {
            return Ok(());
        }
        collection::create_collection_if_missing(&self.storage.config, &self.space, &self.db, name)
            .await?;

        let created_at = Utc::now().to_rfc3339();
        let meta = json!({ "name": name, "createdAt": created_at });
        file_storage::atomic_write(&meta_path, serde_json::to_string_pretty(&meta)?.as_bytes())
            .await?;

        let mut system_doc = self.load_system_index().await?;
        if !system_doc.get("collections").is_some_and(Value::is_object) {
            system_doc["collections"] = json!({});
        }
        if let Some(cols) = system_doc["collections"].as_object_mut() {
            cols.insert(name.to_string(), json!({ "createdAt": created_at }));
        }
        self.save_system_index(system_doc).await?;

        tracing::debug!(collection = name, "📁 Collection créée");
        Ok(())
    }

    async fn ensure_collection(&self, collection: &str) -> Result<()> {
        let meta_path = self
            .storage
            .config
            .db_collection_path(&self.space, &self.db, collection)
            .join("_meta.json");
        if !meta_path.exists() {
            self.create_collection(collection).await?;
        }
        Ok(())
    }

    // --- ÉCRITURE ET MISE À JOUR ---

    /// Écrit le document tel quel (l'ID est obligatoire).
    pub async fn insert_raw(&self, collection: &str, doc: &Value) -> Result<()> {
        let id = doc
            .get("id")
            .and_then(document_id)
            .ok_or_else(|| anyhow!("ID manquant"))?;
        self.ensure_collection(collection).await?;
        self.storage
            .write_document(&self.space, &self.db, collection, &id, doc)
            .await
    }

    pub async fn delete_document(&self, collection: &str, id: &str) -> Result<bool> {
        self.storage
            .delete_document(&self.space, &self.db, collection, id)
            .await
    }
}

/// Les IDs peuvent être des chaînes ou des entiers (identifiants d'éditeurs).
pub fn document_id(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
