// FICHIER : server/src/json_db/transactions/manager.rs

use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::transactions::{wal, ActiveTransaction, Operation, TransactionStatus};
use anyhow::{anyhow, Context, Result};
use futures::future::{join_all, try_join_all};
use std::collections::HashSet;

pub struct TransactionManager<'a> {
    manager: &'a CollectionsManager<'a>,
}

impl<'a> TransactionManager<'a> {
    pub fn new(manager: &'a CollectionsManager<'a>) -> Self {
        Self { manager }
    }

    /// Prépare puis applique un lot d'écritures de façon atomique :
    /// soit tout est persisté, soit les images avant sont restaurées.
    pub async fn execute<F>(&self, op_block: F) -> Result<()>
    where
        F: FnOnce(&mut ActiveTransaction) -> Result<()>,
    {
        let mut tx = ActiveTransaction::new();
        op_block(&mut tx)?;
        if tx.is_empty() {
            return Ok(());
        }

        {
            let mut seen = HashSet::new();
            for op in &tx.operations {
                if !seen.insert((op.collection(), op.id())) {
                    return Err(anyhow!(
                        "Transaction invalide : plusieurs opérations sur {}/{}",
                        op.collection(),
                        op.id()
                    ));
                }
            }
        }

        // 1. VERROUILLAGE (ordre trié)
        let collections = tx.collections();
        let _guards = self
            .manager
            .storage
            .locks
            .lock_collections(&self.manager.space, &self.manager.db, &collections)
            .await;

        // 2. IMAGES AVANT
        let befores = try_join_all(
            tx.operations
                .iter()
                .map(|op| self.manager.get_document(op.collection(), op.id())),
        )
        .await?;
        for (op, before) in tx.operations.iter_mut().zip(befores) {
            op.set_previous(before);
        }

        // 3. JOURNAL
        let cfg = &self.manager.storage.config;
        let (space, db) = (&self.manager.space, &self.manager.db);
        wal::write_entry(cfg, space, db, &tx.to_record(TransactionStatus::Pending)).await?;

        // 4. APPLICATION
        // join_all : toutes les écritures sont terminées avant une éventuelle compensation
        let results = join_all(tx.operations.iter().map(|op| self.apply(op))).await;
        let failure = results.into_iter().find_map(|r| r.err());

        match failure {
            None => {
                wal::remove_entry(cfg, space, db, &tx.id).await?;
                tracing::debug!(tx = %tx.id, ops = tx.operations.len(), "✅ Transaction validée");
                Ok(())
            }
            Some(err) => {
                tracing::warn!(tx = %tx.id, "↩️ Échec de transaction, compensation : {:#}", err);
                // En cas d'échec de compensation, l'entrée reste dans le WAL pour `recover`
                self.compensate(&tx.operations)
                    .await
                    .context("Compensation impossible, entrée WAL conservée")?;
                wal::write_entry(cfg, space, db, &tx.to_record(TransactionStatus::Aborted))
                    .await?;
                wal::remove_entry(cfg, space, db, &tx.id).await?;
                Err(err)
            }
        }
    }

    /// Rejoue la compensation des transactions interrompues (démarrage).
    pub async fn recover(&self) -> Result<usize> {
        let cfg = &self.manager.storage.config;
        let (space, db) = (&self.manager.space, &self.manager.db);
        let pending = wal::list_pending(cfg, space, db).await?;
        let count = pending.len();

        for record in pending {
            if record.status == TransactionStatus::Pending {
                tracing::warn!(tx = %record.id, "🩹 Transaction interrompue, restauration");
                self.compensate(&record.operations).await?;
            }
            wal::remove_entry(cfg, space, db, &record.id).await?;
        }
        Ok(count)
    }

    async fn apply(&self, op: &Operation) -> Result<()> {
        match op {
            Operation::Put {
                collection,
                document,
                ..
            } => self.manager.insert_raw(collection, document).await,
            Operation::Delete { collection, id, .. } => {
                self.manager.delete_document(collection, id).await.map(|_| ())
            }
        }
    }

    async fn compensate(&self, operations: &[Operation]) -> Result<()> {
        let restores = operations.iter().map(|op| async move {
            match op.previous() {
                Some(before) => {
                    self.manager
                        .storage
                        .write_document(
                            &self.manager.space,
                            &self.manager.db,
                            op.collection(),
                            op.id(),
                            before,
                        )
                        .await
                }
                None => self
                    .manager
                    .delete_document(op.collection(), op.id())
                    .await
                    .map(|_| ()),
            }
        });
        try_join_all(restores).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::json_db::storage::{JsonDbConfig, StorageEngine};
    use crate::json_db::transactions::TransactionRecord;
    use serde_json::json;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_transaction_commit_success() {
        let dir = tempdir().unwrap();
        let storage = StorageEngine::new(JsonDbConfig::new(dir.path().to_path_buf()));
        let cm = CollectionsManager::new(&storage, "s", "d");
        cm.insert_raw("members", &json!({ "id": "old" })).await.unwrap();

        let tm = TransactionManager::new(&cm);
        tm.execute(|tx| {
            tx.put("members", "m1", json!({ "id": "m1", "editorId": 1 }));
            tx.put("members", "m2", json!({ "id": "m2", "editorId": 2 }));
            tx.delete("members", "old");
            Ok(())
        })
        .await
        .unwrap();

        let ids: Vec<String> = cm
            .list_all("members")
            .await
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["m1", "m2"]);
        assert!(wal::list_pending(&storage.config, "s", "d")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_failed_operation_restores_before_images() {
        let dir = tempdir().unwrap();
        let storage = StorageEngine::new(JsonDbConfig::new(dir.path().to_path_buf()));
        let cm = CollectionsManager::new(&storage, "s", "d");
        cm.insert_raw("members", &json!({ "id": "keep", "v": 1 }))
            .await
            .unwrap();

        let tm = TransactionManager::new(&cm);
        let res = tm
            .execute(|tx| {
                tx.put("members", "new", json!({ "id": "new" }));
                tx.delete("members", "keep");
                // Document sans ID : l'écriture échoue
                tx.put("members", "broken", json!({ "name": "x" }));
                Ok(())
            })
            .await;
        assert!(res.is_err());

        assert!(cm.get("members", "new").await.unwrap().is_none());
        assert_eq!(cm.get("members", "keep").await.unwrap().unwrap()["v"], 1);
        assert!(wal::list_pending(&storage.config, "s", "d")
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_duplicate_targets_are_rejected() {
        let dir = tempdir().unwrap();
        let storage = StorageEngine::new(JsonDbConfig::new(dir.path().to_path_buf()));
        let cm = CollectionsManager::new(&storage, "s", "d");
        let tm = TransactionManager::new(&cm);

        let res = tm
            .execute(|tx| {
                tx.put("members", "a", json!({ "id": "a" }));
                tx.delete("members", "a");
                Ok(())
            })
            .await;
        assert!(res.is_err());
        assert!(cm.get("members", "a").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recover_rolls_back_interrupted_transaction() {
        let dir = tempdir().unwrap();
        let storage = StorageEngine::new(JsonDbConfig::new(dir.path().to_path_buf()));
        let cm = CollectionsManager::new(&storage, "s", "d");

        // Simule un crash : l'écriture est faite mais l'entrée WAL est restée
        cm.insert_raw("members", &json!({ "id": "half" })).await.unwrap();
        let record = TransactionRecord {
            id: "tx-crash".into(),
            operations: vec![Operation::Put {
                collection: "members".into(),
                id: "half".into(),
                document: json!({ "id": "half" }),
                previous: None,
            }],
            status: TransactionStatus::Pending,
            started_at: 0,
        };
        wal::write_entry(&storage.config, "s", "d", &record)
            .await
            .unwrap();

        let tm = TransactionManager::new(&cm);
        assert_eq!(tm.recover().await.unwrap(), 1);
        assert!(cm.get("members", "half").await.unwrap().is_none());
        assert_eq!(tm.recover().await.unwrap(), 0);
    }
}
