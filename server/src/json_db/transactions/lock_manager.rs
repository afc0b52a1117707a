// FICHIER : server/src/json_db/transactions/lock_manager.rs

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

/// Gestionnaire de verrous (granularité : collection)
#[derive(Debug, Default, Clone)]
pub struct LockManager {
    // Clé = "space/db/collection"
    locks: Arc<Mutex<HashMap<String, Arc<RwLock<()>>>>>,
}

impl LockManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn get_lock(&self, space: &str, db: &str, collection: &str) -> Arc<RwLock<()>> {
        let key = format!("{}/{}/{}", space, db, collection);
        // Un mutex empoisonné ne contient qu'une map de verrous : on la récupère telle quelle
        let mut map = self.locks.lock().unwrap_or_else(|p| p.into_inner());
        map.entry(key)
            .or_insert_with(|| Arc::new(RwLock::new(())))
            .clone()
    }

    /// Verrouille en écriture les collections dans l'ordre fourni.
    /// L'appelant fournit une liste triée pour éviter les interblocages.
    pub async fn lock_collections(
        &self,
        space: &str,
        db: &str,
        collections: &[String],
    ) -> Vec<OwnedRwLockWriteGuard<()>> {
        let mut guards = Vec::with_capacity(collections.len());
        for col in collections {
            guards.push(self.get_lock(space, db, col).write_owned().await);
        }
        guards
    }
}
