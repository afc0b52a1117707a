// FICHIER : server/src/catalog/repository.rs

use super::differ::CollaboratorDiff;
use super::model::{
    Collaborator, Collection, CollectionWithCollaborators, Editor, MembershipRow,
    COLLABORATOR_TABLE, COLLECTION_TABLE, EDITOR_TABLE,
};
use crate::json_db::collections::manager::CollectionsManager;
use crate::json_db::query::{Query, QueryEngine, SortOrder};
use crate::json_db::storage::StorageEngine;
use crate::json_db::transactions::TransactionManager;
use crate::utils::prelude::*;
use chrono::DateTime;
use futures::future::try_join_all;

/// Accès aux tables collection / appartenance / éditeur.
/// Les erreurs du moteur remontent en `Persistence`.
pub struct CollectionRepository<'a> {
    db: CollectionsManager<'a>,
}

impl<'a> CollectionRepository<'a> {
    pub fn new(storage: &'a StorageEngine, space: &str, db: &str) -> Self {
        Self {
            db: CollectionsManager::new(storage, space, db),
        }
    }

    // --- COLLECTIONS ---

    pub async fn find(&self, id: &str) -> Result<Option<Collection>> {
        let doc = self
            .db
            .get(COLLECTION_TABLE, id)
            .await
            .map_err(AppError::persistence)?;
        doc.map(serde_json::from_value)
            .transpose()
            .map_err(AppError::from)
    }

    /// Collection + collaborateurs, noms reconstruits depuis la table `editor`.
    pub async fn find_with_collaborators(
        &self,
        id: &str,
    ) -> Result<Option<CollectionWithCollaborators>> {
        let Some(collection) = self.find(id).await? else {
            return Ok(None);
        };
        let collaborators = self.list_collaborators(id).await?;
        Ok(Some(CollectionWithCollaborators {
            collection,
            collaborators,
        }))
    }

    pub async fn list_collections(&self) -> Result<Vec<Collection>> {
        let docs = self
            .db
            .list_all(COLLECTION_TABLE)
            .await
            .map_err(AppError::persistence)?;
        docs.into_iter()
            .map(|d| serde_json::from_value(d).map_err(AppError::from))
            .collect()
    }

    pub async fn save_collection(&self, collection: &Collection) -> Result<()> {
        let doc = serde_json::to_value(collection)?;
        self.db
            .insert_raw(COLLECTION_TABLE, &doc)
            .await
            .map_err(AppError::persistence)
    }

    // --- APPARTENANCE ---

    pub async fn list_memberships(&self, collection_id: &str) -> Result<Vec<MembershipRow>> {
        let engine = QueryEngine::new(&self.db);
        let query = Query::new(COLLABORATOR_TABLE)
            .where_eq("collectionId", json!(collection_id))
            .order_by("addedAt", SortOrder::Asc)
            .order_by("editorId", SortOrder::Asc);
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

    pub async fn list_collaborators(&self, collection_id: &str) -> Result<Vec<Collaborator>> {
        let rows = self.list_memberships(collection_id).await?;
        let lookups = rows.iter().map(|row| self.find_editor(row.editor_id));
        let editors = try_join_all(lookups).await?;

        Ok(rows
            .iter()
            .zip(editors)
            .map(|(row, editor)| {
                let name = editor.map(|e| e.name).unwrap_or_else(|| {
                    warn!(editor = row.editor_id, "⚠️ Collaborateur sans fiche éditeur");
                    String::new()
                });
                Collaborator {
                    id: row.editor_id,
                    name,
                }
            })
            .collect())
    }

    /// Applique l'écart en un seul lot atomique.
    pub async fn apply_membership(
        &self,
        collection_id: &str,
        diff: &CollaboratorDiff,
        at: DateTime<Utc>,
    ) -> Result<()> {
        let inserts = diff
            .editors_to_insert()
            .into_iter()
            .map(|editor_id| MembershipRow::new(collection_id, editor_id, at))
            .map(|row| serde_json::to_value(&row).map(|doc| (row.id, doc)))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let deletes: Vec<String> = diff
            .editors_to_delete()
            .into_iter()
            .map(|editor_id| MembershipRow::key(collection_id, editor_id))
            .collect();

        if inserts.is_empty() && deletes.is_empty() {
            return Ok(());
        }

        let tm = TransactionManager::new(&self.db);
        tm.execute(|tx| {
            for (id, doc) in inserts {
                tx.put(COLLABORATOR_TABLE, &id, doc);
            }
            for id in &deletes {
                tx.delete(COLLABORATOR_TABLE, id);
            }
            Ok(())
        })
        .await
        .map_err(AppError::persistence)?;

        debug!(
            collection = collection_id,
            added = diff.added.len(),
            removed = diff.removed.len(),
            "👥 Collaborateurs synchronisés"
        );
        Ok(())
    }

    // --- ÉDITEURS ---

    pub async fn find_editor(&self, id: i64) -> Result<Option<Editor>> {
        let doc = self
            .db
            .get(EDITOR_TABLE, &id.to_string())
            .await
            .map_err(AppError::persistence)?;
        doc.map(serde_json::from_value)
            .transpose()
            .map_err(AppError::from)
    }

    pub async fn save_editor(&self, editor: &Editor) -> Result<()> {
        let doc = serde_json::to_value(editor)?;
        self.db
            .insert_raw(EDITOR_TABLE, &doc)
            .await
            .map_err(AppError::persistence)
    }
}
