//! Transactions atomiques multi-documents (WAL + compensation)

pub mod lock_manager;
pub mod manager;
pub mod transaction;
pub mod wal;

pub use manager::TransactionManager;
pub use transaction::ActiveTransaction;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Une écriture élémentaire. `previous` est l'image avant, capturée sous verrou
/// juste avant l'application ; elle sert à la compensation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Operation {
    Put {
        collection: String,
        id: String,
        document: Value,
        #[serde(default)]
        previous: Option<Value>,
    },
    Delete {
        collection: String,
        id: String,
        #[serde(default)]
        previous: Option<Value>,
    },
}

impl Operation {
    pub fn collection(&self) -> &str {
        match self {
            Operation::Put { collection, .. } | Operation::Delete { collection, .. } => collection,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Operation::Put { id, .. } | Operation::Delete { id, .. } => id,
        }
    }

    pub fn previous(&self) -> Option<&Value> {
        match self {
            Operation::Put { previous, .. } | Operation::Delete { previous, .. } => {
                previous.as_ref()
            }
        }
    }

    fn set_previous(&mut self, before: Option<Value>) {
        match self {
            Operation::Put { previous, .. } | Operation::Delete { previous, .. } => {
                *previous = before
            }
        }
    }
}

/// Enregistrement immuable écrit dans le WAL
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: String,
    pub operations: Vec<Operation>,
    pub status: TransactionStatus,
    pub started_at: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    /// Compensation terminée, entrée en cours de suppression
    Aborted,
}
