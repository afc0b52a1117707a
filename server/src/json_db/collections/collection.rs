// FICHIER : server/src/json_db/collections/collection.rs

//! Primitives collections : gestion des dossiers et fichiers JSON d'une collection.
//! Pas de logique métier ici, uniquement persistance et I/O.

use crate::json_db::storage::{file_storage, JsonDbConfig};
use anyhow::Result;
use serde_json::Value;
use std::path::PathBuf;
use tokio::fs;

/// Racine des collections : {db_root}/collections/{collection}
pub fn collection_root(cfg: &JsonDbConfig, space: &str, db: &str, collection: &str) -> PathBuf {
    cfg.db_collection_path(space, db, collection)
}

/// S'assure que la collection existe (création récursive).
pub async fn create_collection_if_missing(
    cfg: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
) -> Result<()> {
    fs::create_dir_all(collection_root(cfg, space, db, collection)).await?;
    Ok(())
}

pub async fn list_document_ids(
    cfg: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
) -> Result<Vec<String>> {
    let root = collection_root(cfg, space, db, collection);
    let mut out = Vec::new();
    if !root.exists() {
        return Ok(out);
    }
    let mut entries = fs::read_dir(&root).await?;
    while let Some(e) = entries.next_entry().await? {
        let p = e.path();
        if p.is_file() && p.extension().and_then(|s| s.to_str()) == Some("json") {
            if let Some(stem) = p.file_stem().and_then(|s| s.to_str()) {
                // "_meta.json" et consorts ne sont pas des documents
                if !stem.starts_with('_') {
                    out.push(stem.to_string());
                }
            }
        }
    }
    out.sort();
    Ok(out)
}

pub async fn list_documents(
    cfg: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
) -> Result<Vec<Value>> {
    let ids = list_document_ids(cfg, space, db, collection).await?;
    let mut docs = Vec::with_capacity(ids.len());
    for id in ids {
        // Un fichier supprimé entre le listing et la lecture est simplement ignoré
        if let Some(doc) = file_storage::read_document(cfg, space, db, collection, &id).await? {
            docs.push(doc);
        }
    }
    Ok(docs)
}
