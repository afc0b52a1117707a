// FICHIER : server/src/routes/mod.rs

pub mod collections;
pub mod extractors;
pub mod revisions;
pub mod templates;

use crate::AppState;
use axum::http::{header, HeaderName, Method};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([
            header::CONTENT_TYPE,
            HeaderName::from_static(crate::editor::form::EDITOR_HEADER),
        ]);

    Router::new()
        .route("/", get(revisions::revisions_page))
        .route("/revisions", get(revisions::list_revisions))
        .route("/collection/create/handler", post(collections::create_handler))
        .route("/collection/{id}", get(collections::show_handler))
        .route("/collection/{id}/edit/handler", post(collections::edit_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
