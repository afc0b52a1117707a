// FICHIER : server/src/routes/collections.rs

use super::extractors::CurrentEditor;
use crate::catalog::{CollectionRequest, CollectionWithCollaborators};
use crate::utils::prelude::*;
use crate::AppState;
use axum::extract::{Path, State};
use axum::Json;
use std::sync::Arc;

pub async fn create_handler(
    State(state): State<Arc<AppState>>,
    CurrentEditor(editor): CurrentEditor,
    Json(body): Json<CollectionRequest>,
) -> Result<Json<Value>> {
    let result = state.collections().create(editor, body).await?;
    Ok(Json(result))
}

pub async fn edit_handler(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    CurrentEditor(editor): CurrentEditor,
    Json(body): Json<CollectionRequest>,
) -> Result<Json<Value>> {
    let result = state
        .collections()
        .edit(editor, &collection_id, body)
        .await?;
    Ok(Json(result))
}

pub async fn show_handler(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    CurrentEditor(editor): CurrentEditor,
) -> Result<Json<CollectionWithCollaborators>> {
    let collection = state.collections().show(editor, &collection_id).await?;
    Ok(Json(collection))
}
