// FICHIER : server/src/catalog/model.rs

use crate::utils::prelude::*;
use chrono::DateTime;
use heck::ToUpperCamelCase;
use std::fmt;

// --- TABLES ---

pub const COLLECTION_TABLE: &str = "user_collection";
pub const COLLABORATOR_TABLE: &str = "user_collection_collaborator";
pub const EDITOR_TABLE: &str = "editor";

// --- TYPE D'ENTITÉ ---

/// Catégorie du catalogue à laquelle une collection est dédiée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityType {
    Author,
    Work,
    Edition,
    EditionGroup,
    Publisher,
}

impl EntityType {
    pub const ALL: [EntityType; 5] = [
        EntityType::Author,
        EntityType::Work,
        EntityType::Edition,
        EntityType::EditionGroup,
        EntityType::Publisher,
    ];

    /// Normalise une saisie libre ("edition-group", "edition_group", "Work") vers la forme canonique.
    pub fn parse(raw: &str) -> Result<Self> {
        let canonical = raw.trim().to_upper_camel_case();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == canonical)
            .ok_or_else(|| AppError::Validation(format!("Type d'entité inconnu : '{}'", raw)))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Author => "Author",
            EntityType::Work => "Work",
            EntityType::Edition => "Edition",
            EntityType::EditionGroup => "EditionGroup",
            EntityType::Publisher => "Publisher",
        }
    }

    /// Table des révisions de ce type d'entité
    pub fn revision_table(&self) -> &'static str {
        match self {
            EntityType::Author => "author_revision",
            EntityType::Work => "work_revision",
            EntityType::Edition => "edition_revision",
            EntityType::EditionGroup => "edition_group_revision",
            EntityType::Publisher => "publisher_revision",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- VISIBILITÉ ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Privacy {
    Public,
    #[default]
    Private,
}

impl Privacy {
    /// Toute valeur autre que "Public" rend la collection privée.
    pub fn from_label(label: Option<&str>) -> Self {
        match label {
            Some("Public") => Privacy::Public,
            _ => Privacy::Private,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Privacy::Public => "Public",
            Privacy::Private => "Private",
        }
    }

    pub fn is_public(&self) -> bool {
        *self == Privacy::Public
    }
}

// --- COLLABORATEURS ---

/// Ligne de collaborateur telle qu'envoyée par le formulaire.
/// `id: null` désigne une ligne pas encore renseignée.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CollaboratorRef {
    pub id: Option<i64>,
    #[serde(default)]
    pub name: String,
}

impl CollaboratorRef {
    pub fn placeholder() -> Self {
        Self::default()
    }

    pub fn is_placeholder(&self) -> bool {
        self.id.is_none()
    }

    /// `None` pour une ligne vide
    pub fn resolved(&self) -> Option<Collaborator> {
        self.id.map(|id| Collaborator {
            id,
            name: self.name.clone(),
        })
    }
}

/// Collaborateur effectif (identité d'éditeur connue)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Collaborator {
    pub id: i64,
    pub name: String,
}

impl From<Collaborator> for CollaboratorRef {
    fn from(c: Collaborator) -> Self {
        Self {
            id: Some(c.id),
            name: c.name,
        }
    }
}

/// Ligne de la table d'appartenance. L'id dérive de (collection, éditeur) :
/// un éditeur ne peut apparaître qu'une fois par collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MembershipRow {
    pub id: String,
    pub collection_id: String,
    pub editor_id: i64,
    // Trié comme chaîne par la requête d'appartenance
    #[serde(with = "crate::revisions::model::timestamp")]
    pub added_at: DateTime<Utc>,
}

impl MembershipRow {
    pub fn new(collection_id: &str, editor_id: i64, added_at: DateTime<Utc>) -> Self {
        Self {
            id: Self::key(collection_id, editor_id),
            collection_id: collection_id.to_string(),
            editor_id,
            added_at,
        }
    }

    pub fn key(collection_id: &str, editor_id: i64) -> String {
        format!("{}_{}", collection_id, editor_id)
    }
}

// --- ÉDITEURS ---

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Editor {
    pub id: i64,
    pub name: String,
}

// --- COLLECTION ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    pub id: String,
    pub owner_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub public: bool,
    pub entity_type: EntityType,
    pub created_at: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
}

/// Collection chargée avec ses collaborateurs (ordre d'ajout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionWithCollaborators {
    #[serde(flatten)]
    pub collection: Collection,
    pub collaborators: Vec<Collaborator>,
}

impl CollectionWithCollaborators {
    /// Propriétaire ou collaborateur
    pub fn is_member(&self, editor_id: i64) -> bool {
        self.collection.owner_id == editor_id
            || self.collaborators.iter().any(|c| c.id == editor_id)
    }

    pub fn is_visible_to(&self, viewer: Option<i64>) -> bool {
        self.collection.public || viewer.is_some_and(|id| self.is_member(id))
    }
}

// --- REQUÊTE DE SOUMISSION ---

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub privacy: Option<String>,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub collaborators: Vec<CollaboratorRef>,
}
