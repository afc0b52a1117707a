// FICHIER : server/src/json_db/storage/file_storage.rs

use crate::json_db::storage::JsonDbConfig;
use anyhow::{anyhow, Context, Result};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;

/// Crée l'arborescence physique de la base (idempotent).
pub async fn create_db(config: &JsonDbConfig, space: &str, db: &str) -> Result<()> {
    let collections_root = config.db_root(space, db).join("collections");
    fs::create_dir_all(&collections_root)
        .await
        .context("Failed to create DB root directory")?;
    fs::create_dir_all(config.wal_dir(space, db))
        .await
        .context("Failed to create WAL directory")?;
    Ok(())
}

/// Chemin du document ; un ID ne doit jamais sortir du dossier de sa collection.
pub fn document_path(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
    id: &str,
) -> Result<PathBuf> {
    if id.is_empty() || id.contains(['/', '\\']) || id.contains("..") {
        return Err(anyhow!("ID de document invalide : '{}'", id));
    }
    Ok(config
        .db_collection_path(space, db, collection)
        .join(format!("{}.json", id)))
}

pub async fn write_document(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
    id: &str,
    doc: &Value,
) -> Result<()> {
    let file_path = document_path(config, space, db, collection, id)?;
    let content = serde_json::to_string_pretty(doc)?;
    atomic_write(file_path, content.as_bytes()).await
}

pub async fn read_document(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
    id: &str,
) -> Result<Option<Value>> {
    let file_path = document_path(config, space, db, collection, id)?;

    if !file_path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&file_path)
        .await
        .with_context(|| format!("Lecture impossible : {:?}", file_path))?;
    let doc = serde_json::from_str(&content)
        .with_context(|| format!("JSON corrompu : {:?}", file_path))?;
    Ok(Some(doc))
}

pub async fn delete_document(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
    collection: &str,
    id: &str,
) -> Result<bool> {
    let file_path = document_path(config, space, db, collection, id)?;

    if !file_path.exists() {
        return Ok(false);
    }
    fs::remove_file(&file_path)
        .await
        .with_context(|| format!("Suppression impossible : {:?}", file_path))?;
    Ok(true)
}

/// Écriture atomique sécurisée (write -> sync -> rename)
pub async fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            fs::create_dir_all(parent).await?;
        }
    }

    // Nom temporaire unique : deux écritures concurrentes ne partagent pas le fichier
    let temp_path = path.with_extension(format!("{}.tmp", uuid::Uuid::new_v4().simple()));

    {
        let mut file = fs::File::create(&temp_path).await?;
        file.write_all(content).await?;
        file.sync_all().await?;
    }

    fs::rename(&temp_path, path).await?;
    Ok(())
}
