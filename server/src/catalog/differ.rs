// FICHIER : server/src/catalog/differ.rs

use super::model::Collaborator;
use std::collections::HashSet;

/// Écart entre deux listes de collaborateurs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollaboratorDiff {
    pub added: Vec<Collaborator>,
    pub removed: Vec<Collaborator>,
}

impl CollaboratorDiff {
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }

    /// Éditeurs à insérer : un par identité, dans l'ordre d'apparition.
    /// Un éditeur à la fois retiré et ajouté (nom modifié) garde sa ligne
    /// d'appartenance, donc sa position.
    pub fn editors_to_insert(&self) -> Vec<i64> {
        let already_member: HashSet<i64> = self.removed.iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();
        self.added
            .iter()
            .map(|c| c.id)
            .filter(|id| !already_member.contains(id) && seen.insert(*id))
            .collect()
    }

    /// Éditeurs à retirer ; un nom modifié ne retire personne.
    pub fn editors_to_delete(&self) -> Vec<i64> {
        let kept: HashSet<i64> = self.added.iter().map(|c| c.id).collect();
        let mut seen = HashSet::new();
        self.removed
            .iter()
            .map(|c| c.id)
            .filter(|id| !kept.contains(id) && seen.insert(*id))
            .collect()
    }
}

/// `added = incoming \ prior`, `removed = prior \ incoming`.
/// Égalité structurelle sur (id, nom) ; l'ordre d'apparition est conservé.
pub fn diff_collaborators(prior: &[Collaborator], incoming: &[Collaborator]) -> CollaboratorDiff {
    CollaboratorDiff {
        added: incoming
            .iter()
            .filter(|c| !prior.contains(c))
            .cloned()
            .collect(),
        removed: prior
            .iter()
            .filter(|c| !incoming.contains(c))
            .cloned()
            .collect(),
    }
}
