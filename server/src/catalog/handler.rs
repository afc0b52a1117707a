// FICHIER : server/src/catalog/handler.rs

use super::differ::diff_collaborators;
use super::model::{
    Collaborator, Collection, CollectionRequest, CollectionWithCollaborators, EntityType, Privacy,
};
use super::repository::CollectionRepository;
use crate::search::{SearchIndexer, SearchProjection};
use crate::utils::prelude::*;

/// Champs validés d'une soumission
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedSubmission {
    pub name: String,
    pub description: Option<String>,
    pub privacy: Privacy,
    pub entity_type: EntityType,
    pub collaborators: Vec<Collaborator>,
}

impl ValidatedSubmission {
    /// Nom et type obligatoires ; les lignes vides sont écartées.
    pub fn from_request(request: CollectionRequest) -> Result<Self> {
        let name = request.name.trim().to_string();
        if name.is_empty() {
            return Err(AppError::Validation("le nom est obligatoire".into()));
        }
        let entity_type = match request.entity_type.as_deref().map(str::trim) {
            Some(raw) if !raw.is_empty() => EntityType::parse(raw)?,
            _ => return Err(AppError::Validation("le type d'entité est obligatoire".into())),
        };

        Ok(Self {
            name,
            description: request.description,
            privacy: Privacy::from_label(request.privacy.as_deref()),
            entity_type,
            collaborators: request
                .collaborators
                .iter()
                .filter_map(|c| c.resolved())
                .collect(),
        })
    }
}

/// Création / édition d'une collection et réconciliation de ses collaborateurs.
pub struct CollectionService<'a> {
    repo: CollectionRepository<'a>,
    indexer: &'a dyn SearchIndexer,
}

impl<'a> CollectionService<'a> {
    pub fn new(repo: CollectionRepository<'a>, indexer: &'a dyn SearchIndexer) -> Self {
        Self { repo, indexer }
    }

    pub fn repository(&self) -> &CollectionRepository<'a> {
        &self.repo
    }

    /// Identité du demandeur : obligatoire et connue de la table `editor`.
    pub async fn authenticate(&self, requester: Option<i64>) -> Result<i64> {
        let id = requester
            .ok_or_else(|| AppError::Unauthorized("en-tête x-editor-id manquant".into()))?;
        match self.repo.find_editor(id).await? {
            Some(_) => Ok(id),
            None => Err(AppError::Unauthorized(format!("éditeur {} inconnu", id))),
        }
    }

    pub async fn create(&self, requester: Option<i64>, request: CollectionRequest) -> Result<Value> {
        let editor_id = self.authenticate(requester).await?;
        self.submit(editor_id, None, request).await
    }

    pub async fn edit(
        &self,
        requester: Option<i64>,
        collection_id: &str,
        request: CollectionRequest,
    ) -> Result<Value> {
        let editor_id = self.authenticate(requester).await?;
        let existing = self
            .find_existing(collection_id)
            .await?
            .filter(|c| c.is_visible_to(Some(editor_id)))
            .ok_or_else(|| AppError::NotFound(format!("collection {}", collection_id)))?;
        if !existing.is_member(editor_id) {
            return Err(AppError::Forbidden(format!(
                "l'éditeur {} ne peut pas modifier la collection {}",
                editor_id, collection_id
            )));
        }
        self.submit(editor_id, Some(existing), request).await
    }

    /// `existing` absent : création. Présent : édition.
    pub async fn submit(
        &self,
        editor_id: i64,
        existing: Option<CollectionWithCollaborators>,
        request: CollectionRequest,
    ) -> Result<Value> {
        let submission = ValidatedSubmission::from_request(request)?;
        self.ensure_editors_exist(&submission.collaborators).await?;

        let now = Utc::now();
        let (mut collection, prior) = match existing {
            None => (
                Collection {
                    id: Uuid::new_v4().to_string(),
                    owner_id: editor_id,
                    name: String::new(),
                    description: None,
                    public: false,
                    entity_type: submission.entity_type,
                    created_at: now,
                    last_modified: now,
                },
                None,
            ),
            Some(e) => (e.collection.clone(), Some(e)),
        };

        collection.name = submission.name;
        collection.description = submission.description;
        collection.public = submission.privacy.is_public();
        collection.entity_type = submission.entity_type;
        collection.last_modified = now;
        self.repo.save_collection(&collection).await?;

        let prior_collaborators = prior.as_ref().map(|p| p.collaborators.as_slice()).unwrap_or(&[]);
        let diff = diff_collaborators(prior_collaborators, &submission.collaborators);
        self.repo.apply_membership(&collection.id, &diff, now).await?;

        let renamed = prior
            .as_ref()
            .is_some_and(|p| p.collection.name != collection.name);
        if prior.is_none() || renamed {
            info!(collection = %collection.id, new = prior.is_none(), "📚 Collection à indexer");
            let projection = SearchProjection::from_collection(&collection);
            return self.indexer.index_entity(&projection).await;
        }

        let saved = self
            .repo
            .find_with_collaborators(&collection.id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("collection {}", collection.id)))?;
        Ok(serde_json::to_value(saved)?)
    }

    /// Lecture : une collection privée n'est visible que de ses membres.
    pub async fn show(
        &self,
        viewer: Option<i64>,
        collection_id: &str,
    ) -> Result<CollectionWithCollaborators> {
        match self.find_existing(collection_id).await? {
            Some(c) if c.is_visible_to(viewer) => Ok(c),
            _ => Err(AppError::NotFound(format!("collection {}", collection_id))),
        }
    }

    /// Réindexe toutes les collections (outil d'administration)
    pub async fn reindex_all(&self) -> Result<usize> {
        let collections = self.repo.list_collections().await?;
        for collection in &collections {
            self.indexer
                .index_entity(&SearchProjection::from_collection(collection))
                .await?;
        }
        Ok(collections.len())
    }

    /// Les IDs de collection sont des UUID : tout autre ID est inconnu.
    async fn find_existing(
        &self,
        collection_id: &str,
    ) -> Result<Option<CollectionWithCollaborators>> {
        if Uuid::parse_str(collection_id).is_err() {
            return Ok(None);
        }
        self.repo.find_with_collaborators(collection_id).await
    }

    async fn ensure_editors_exist(&self, collaborators: &[Collaborator]) -> Result<()> {
        for c in collaborators {
            if self.repo.find_editor(c.id).await?.is_none() {
                return Err(AppError::Validation(format!(
                    "collaborateur inconnu : {}",
                    c.id
                )));
            }
        }
        Ok(())
    }
}
