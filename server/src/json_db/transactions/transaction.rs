// FICHIER : server/src/json_db/transactions/transaction.rs

use super::{Operation, TransactionRecord, TransactionStatus};
use chrono::Utc;
use serde_json::Value;
use uuid::Uuid;

/// Zone de préparation d'une transaction.
/// Elle ne vit en mémoire que le temps du bloc `execute`.
pub struct ActiveTransaction {
    pub id: String,
    pub operations: Vec<Operation>,
    created_at: i64,
}

impl Default for ActiveTransaction {
    fn default() -> Self {
        Self::new()
    }
}

impl ActiveTransaction {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            operations: Vec::new(),
            created_at: Utc::now().timestamp_millis(),
        }
    }

    /// Écrit (ou remplace) un document
    pub fn put(&mut self, collection: &str, id: &str, document: Value) {
        self.operations.push(Operation::Put {
            collection: collection.to_string(),
            id: id.to_string(),
            document,
            previous: None,
        });
    }

    pub fn delete(&mut self, collection: &str, id: &str) {
        self.operations.push(Operation::Delete {
            collection: collection.to_string(),
            id: id.to_string(),
            previous: None,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Collections touchées, triées et dédoublonnées (ordre d'acquisition des verrous)
    pub fn collections(&self) -> Vec<String> {
        let mut cols: Vec<String> = self
            .operations
            .iter()
            .map(|op| op.collection().to_string())
            .collect();
        cols.sort();
        cols.dedup();
        cols
    }

    pub fn to_record(&self, status: TransactionStatus) -> TransactionRecord {
        TransactionRecord {
            id: self.id.clone(),
            operations: self.operations.clone(),
            status,
            started_at: self.created_at,
        }
    }
}
