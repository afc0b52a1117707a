// FICHIER : server/src/editor/form.rs

use crate::catalog::model::{
    Collaborator, CollaboratorRef, CollectionRequest, CollectionWithCollaborators, Privacy,
};
use crate::utils::net_client::post_json;
use crate::utils::prelude::*;
use reqwest::StatusCode;

pub const INCOMPLETE_FORM: &str = "Incomplete Form";
pub const EDITOR_HEADER: &str = "x-editor-id";

/// État local du formulaire de collection.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionForm {
    pub id: Option<String>,
    pub name: String,
    pub description: String,
    pub privacy: Privacy,
    pub entity_type: Option<String>,
    pub collaborators: Vec<CollaboratorRef>,
    pub error_text: Option<String>,
    initial_name: Option<String>,
}

/// Requête prête à partir
#[derive(Debug, Clone, PartialEq)]
pub struct Submission {
    pub url: String,
    pub payload: CollectionRequest,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FormOutcome {
    /// Soumission réussie : page de la collection
    Redirect(String),
    /// Validation locale en échec, rien n'a été envoyé
    Invalid,
    /// Erreur renvoyée par le serveur (texte affiché)
    Failed(String),
}

impl Default for CollectionForm {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionForm {
    /// Formulaire de création
    pub fn new() -> Self {
        Self::from_parts(None, String::new(), String::new(), Privacy::Private, None, Vec::new())
    }

    /// Formulaire d'édition pré-rempli
    pub fn edit(existing: &CollectionWithCollaborators) -> Self {
        let c = &existing.collection;
        Self::from_parts(
            Some(c.id.clone()),
            c.name.clone(),
            c.description.clone().unwrap_or_default(),
            if c.public { Privacy::Public } else { Privacy::Private },
            Some(c.entity_type.to_string()),
            existing
                .collaborators
                .iter()
                .cloned()
                .map(CollaboratorRef::from)
                .collect(),
        )
    }

    fn from_parts(
        id: Option<String>,
        name: String,
        description: String,
        privacy: Privacy,
        entity_type: Option<String>,
        mut collaborators: Vec<CollaboratorRef>,
    ) -> Self {
        // Au premier rendu, une ligne vide à remplir
        if collaborators.is_empty() {
            collaborators.push(CollaboratorRef::placeholder());
        }
        let initial_name = Some(name.clone()).filter(|n| !n.is_empty());
        Self {
            id,
            name,
            description,
            privacy,
            entity_type,
            collaborators,
            error_text: None,
            initial_name,
        }
    }

    // --- ÉDITION DES LIGNES ---

    pub fn add_collaborator_row(&mut self) {
        self.collaborators.push(CollaboratorRef::placeholder());
    }

    pub fn remove_collaborator_row(&mut self, index: usize) {
        if index < self.collaborators.len() {
            self.collaborators.remove(index);
        }
    }

    /// `None` vide la ligne (elle redevient une ligne à remplir).
    pub fn set_collaborator(&mut self, index: usize, value: Option<Collaborator>) {
        if let Some(row) = self.collaborators.get_mut(index) {
            *row = value.map(CollaboratorRef::from).unwrap_or_default();
        }
    }

    // --- SOUMISSION ---

    pub fn submit_label(&self) -> &'static str {
        if self.initial_name.is_some() {
            "UPDATE"
        } else {
            "CREATE"
        }
    }

    pub fn submission_url(&self) -> String {
        match &self.id {
            Some(id) => format!("/collection/{}/edit/handler", id),
            None => "/collection/create/handler".to_string(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .entity_type
                .as_deref()
                .is_some_and(|t| !t.trim().is_empty())
    }

    /// Corps envoyé au serveur, lignes vides retirées
    pub fn payload(&self) -> CollectionRequest {
        CollectionRequest {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            privacy: Some(self.privacy.label().to_string()),
            entity_type: self.entity_type.clone(),
            collaborators: self
                .collaborators
                .iter()
                .filter(|c| !c.is_placeholder())
                .cloned()
                .collect(),
        }
    }

    /// Valide puis prépare l'envoi. `None` si le formulaire est incomplet.
    pub fn prepare_submission(&mut self) -> Option<Submission> {
        if !self.is_valid() {
            self.error_text = Some(INCOMPLETE_FORM.to_string());
            return None;
        }
        self.error_text = None;
        Some(Submission {
            url: self.submission_url(),
            payload: self.payload(),
        })
    }

    /// Interprète la réponse du serveur.
    pub fn handle_response(&mut self, status: StatusCode, body: &Value) -> FormOutcome {
        if status == StatusCode::OK {
            if let Some(id) = body.get("id").and_then(Value::as_str) {
                return FormOutcome::Redirect(format!("/collection/{}", id));
            }
        }
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| body.to_string());
        self.fail(&message)
    }

    fn fail(&mut self, message: &str) -> FormOutcome {
        let text = format!("Internal Error: {}", message);
        self.error_text = Some(text.clone());
        FormOutcome::Failed(text)
    }
}

/// Envoie le formulaire au service HTTP au nom d'un éditeur.
pub struct FormSubmitter {
    base_url: String,
    editor_id: i64,
}

impl FormSubmitter {
    pub fn new(base_url: &str, editor_id: i64) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            editor_id,
        }
    }

    pub async fn submit(&self, form: &mut CollectionForm) -> FormOutcome {
        let Some(submission) = form.prepare_submission() else {
            return FormOutcome::Invalid;
        };
        let url = format!("{}{}", self.base_url, submission.url);
        let headers = [(EDITOR_HEADER, self.editor_id.to_string())];

        match post_json(&url, &submission.payload, &headers).await {
            Ok((status, body)) => form.handle_response(status, &body),
            Err(e) => {
                warn!("⚠️ Soumission impossible vers {} : {}", url, e);
                form.fail(&e.to_string())
            }
        }
    }
}
