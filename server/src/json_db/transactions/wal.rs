// FICHIER : server/src/json_db/transactions/wal.rs

use crate::json_db::storage::{file_storage, JsonDbConfig};
use crate::json_db::transactions::TransactionRecord;
use anyhow::{Context, Result};
use tokio::fs;

/// Écrit (ou réécrit) une transaction dans le journal
pub async fn write_entry(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
    record: &TransactionRecord,
) -> Result<()> {
    let path = config
        .wal_dir(space, db)
        .join(format!("{}.json", record.id));
    let content = serde_json::to_string_pretty(record)?;
    file_storage::atomic_write(&path, content.as_bytes())
        .await
        .context("Impossible d'écrire l'entrée WAL")
}

/// Supprime une entrée du WAL (commit ou rollback terminé)
pub async fn remove_entry(config: &JsonDbConfig, space: &str, db: &str, tx_id: &str) -> Result<()> {
    let path = config.wal_dir(space, db).join(format!("{}.json", tx_id));
    if path.exists() {
        fs::remove_file(path).await?;
    }
    Ok(())
}

/// Charge les transactions restées dans le journal (crash pendant l'application)
pub async fn list_pending(
    config: &JsonDbConfig,
    space: &str,
    db: &str,
) -> Result<Vec<TransactionRecord>> {
    let dir = config.wal_dir(space, db);
    let mut pending = Vec::new();
    if !dir.exists() {
        return Ok(pending);
    }

    let mut entries = fs::read_dir(&dir).await?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            let content = fs::read_to_string(&path).await?;
            let record: TransactionRecord = serde_json::from_str(&content)
                .with_context(|| format!("Entrée WAL corrompue : {:?}", path))?;
            pending.push(record);
        }
    }
    pending.sort_by_key(|r| r.started_at);
    Ok(pending)
}
