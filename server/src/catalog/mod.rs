// FICHIER : server/src/catalog/mod.rs

//! Collections du catalogue : modèle, calcul d'écart des collaborateurs,
//! persistance et traitement des soumissions.

pub mod differ;
pub mod handler;
pub mod model;
pub mod repository;

pub use differ::{diff_collaborators, CollaboratorDiff};
pub use handler::CollectionService;
pub use model::{
    Collaborator, CollaboratorRef, Collection, CollectionRequest, CollectionWithCollaborators,
    Editor, EntityType, Privacy,
};
pub use repository::CollectionRepository;
