// FICHIER : server/src/routes/revisions.rs

use super::templates::{escape_props, TargetPage};
use crate::revisions::{list_page, PageParams, Revision};
use crate::utils::prelude::*;
use crate::AppState;
use axum::extract::{Query, State};
use axum::response::Html;
use axum::Json;
use std::sync::Arc;

/// Paramètres bruts : la validation est faite par `PageParams`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub from: Option<String>,
    pub size: Option<String>,
}

#[derive(Debug, Serialize)]
struct RevisionsProps<'a> {
    from: usize,
    results: &'a [Revision],
    size: usize,
}

async fn load_page(state: &AppState, query: &PageQuery) -> Result<(PageParams, Vec<Revision>)> {
    let page = PageParams::parse(
        query.from.as_deref(),
        query.size.as_deref(),
        &state.config.revisions,
    )?;
    let results = list_page(&state.revisions(), page).await?;
    Ok((page, results))
}

pub async fn list_revisions(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Json<Vec<Revision>>> {
    let (_, results) = load_page(&state, &query).await?;
    Ok(Json(results))
}

pub async fn revisions_page(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PageQuery>,
) -> Result<Html<String>> {
    let (page, results) = load_page(&state, &query).await?;
    let props = RevisionsProps {
        from: page.from,
        results: &results,
        size: page.size,
    };

    let context = tera::Context::from_serialize(&props)
        .map_err(|e| AppError::System(anyhow::Error::new(e)))?;
    let markup = state.pages.render("revisions.html", &context)?;

    let html = state.pages.render_target(&TargetPage {
        dev: state.config.server.dev,
        markup,
        props: escape_props(&props)?,
        script: "/js/revisions.js".to_string(),
        title: "RevisionsPage".to_string(),
    })?;
    Ok(Html(html))
}
