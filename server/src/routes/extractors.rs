// FICHIER : server/src/routes/extractors.rs

use crate::editor::form::EDITOR_HEADER;
use crate::utils::error::AppError;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;

/// Identité de l'éditeur transmise par l'en-tête `x-editor-id`.
/// Absente : `None`. Présente mais illisible : 401.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentEditor(pub Option<i64>);

impl<S: Send + Sync> FromRequestParts<S> for CurrentEditor {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(raw) = parts.headers.get(EDITOR_HEADER) else {
            return Ok(CurrentEditor(None));
        };
        raw.to_str()
            .ok()
            .and_then(|v| v.trim().parse::<i64>().ok())
            .map(|id| CurrentEditor(Some(id)))
            .ok_or_else(|| AppError::Unauthorized(format!("{} invalide", EDITOR_HEADER)))
    }
}
