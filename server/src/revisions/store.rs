// FICHIER : server/src/revisions/store.rs

use super::model::{timestamp, NewRevision, Revision};
use crate::catalog::model::EntityType;
use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::query::{Query, QueryEngine, SortOrder};
use crate::json_db::storage::StorageEngine;
use crate::utils::prelude::*;

/// Tables de révisions, une par type d'entité.
pub struct RevisionStore<'a> {
    db: CollectionsManager<'a>,
}

impl<'a> RevisionStore<'a> {
    pub fn new(storage: &'a StorageEngine, space: &str, db: &str) -> Self {
        Self {
            db: CollectionsManager::new(storage, space, db),
        }
    }

    /// Les `limit` révisions les plus récentes d'un type d'entité.
    pub async fn recent(&self, entity_type: EntityType, limit: usize) -> Result<Vec<Revision>> {
        let engine = QueryEngine::new(&self.db);
        let query = Query::new(entity_type.revision_table())
            .order_by("createdAt", SortOrder::Desc)
            .order_by("id", SortOrder::Desc)
            .limit(limit);
        let result = engine
            .execute_query(query)
            .await
            .map_err(AppError::persistence)?;

        result
            .documents
            .into_iter()
            .map(|d| serde_json::from_value(d).map_err(AppError::from))
            .collect()
    }

    /// Ajoute une révision. Les ids sont globaux à toutes les tables.
    pub async fn append(&self, new: NewRevision) -> Result<Revision> {
        let mut tables: Vec<String> = EntityType::ALL
            .iter()
            .map(|t| t.revision_table().to_string())
            .collect();
        tables.sort();
        let _guards = self
            .db
            .storage
            .locks
            .lock_collections(&self.db.space, &self.db.db, &tables)
            .await;

        let mut max_id = 0;
        for table in &tables {
            let docs = self
                .db
                .list_all(table)
                .await
                .map_err(AppError::persistence)?;
            if let Some(m) = docs.iter().filter_map(|d| d["id"].as_i64()).max() {
                max_id = max_id.max(m);
            }
        }

        let revision = Revision {
            id: max_id + 1,
            entity_type: new.entity_type,
            entity_bbid: new.entity_bbid,
            author_id: new.author_id,
            note: new.note,
            created_at: new.created_at.unwrap_or_else(Utc::now),
        };
        let doc = serde_json::to_value(&revision)?;
        self.db
            .insert_raw(revision.entity_type.revision_table(), &doc)
            .await
            .map_err(AppError::persistence)?;

        debug!(
            id = revision.id,
            entity = %revision.entity_type,
            at = %timestamp::format(&revision.created_at),
            "📝 Révision ajoutée"
        );
        Ok(revision)
    }
}
