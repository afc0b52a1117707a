// FICHIER : server/src/utils/error.rs

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use std::io;

// --- RE-EXPORTS ANYHOW ---
// Utilisés par la couche json_db (erreurs techniques non typées)
pub use anyhow::{anyhow, Context};
// On renomme le Result de anyhow pour ne pas qu'il écrase le nôtre
pub use anyhow::Result as AnyResult;

/// Type de résultat standard pour le service Bookshelf.
pub type Result<T> = std::result::Result<T, AppError>;

/// Enumération centrale des erreurs de l'application.
///
/// Les variantes métier (`Validation`, `NotFound`, `Persistence`, `Indexing`, ...)
/// portent assez de contexte pour que la couche HTTP choisisse le bon code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Erreur de configuration : {0}")]
    Config(String),

    #[error("Erreur d'entrée/sortie : {0}")]
    Io(#[from] io::Error),

    #[error("Erreur Base de Données : {0}")]
    Database(String),

    #[error("Erreur Réseau : {0}")]
    Network(#[from] reqwest::Error),

    #[error("Erreur Système : {0}")]
    System(#[from] anyhow::Error),

    #[error("Introuvable : {0}")]
    NotFound(String),

    #[error("Erreur de sérialisation : {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Formulaire invalide : {0}")]
    Validation(String),

    #[error("Identité requise : {0}")]
    Unauthorized(String),

    #[error("Accès refusé : {0}")]
    Forbidden(String),

    #[error("Échec de persistance : {0}")]
    Persistence(String),

    #[error("Échec d'indexation : {0}")]
    Indexing(String),
}

impl AppError {
    /// Code HTTP associé à chaque famille d'erreur.
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Indexing(_) | AppError::Network(_) => StatusCode::BAD_GATEWAY,
            AppError::Config(_)
            | AppError::Io(_)
            | AppError::Database(_)
            | AppError::System(_)
            | AppError::Serialization(_)
            | AppError::Persistence(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Convertit une erreur du moteur json_db en échec de persistance.
    pub fn persistence(err: anyhow::Error) -> Self {
        AppError::Persistence(format!("{:#}", err))
    }
}

// Sérialisation en simple chaîne (réponses JSON, CLI)
impl Serialize for AppError {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.serialize_str(self.to_string().as_ref())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %self, "❌ Requête en échec");
        } else {
            tracing::warn!(status = status.as_u16(), error = %self, "⚠️ Requête rejetée");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

// Permet de faire : return Err("Mon erreur".into());
impl From<String> for AppError {
    fn from(s: String) -> Self {
        AppError::System(anyhow::anyhow!(s))
    }
}

impl From<&str> for AppError {
    fn from(s: &str) -> Self {
        AppError::System(anyhow::anyhow!(s.to_string()))
    }
}
