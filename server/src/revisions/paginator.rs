// FICHIER : server/src/revisions/paginator.rs

use super::model::Revision;
use super::store::RevisionStore;
use crate::catalog::model::EntityType;
use crate::utils::config::RevisionsConfig;
use crate::utils::prelude::*;
use futures::future::try_join_all;
use std::cmp::Ordering;

/// Fenêtre de pagination validée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageParams {
    pub from: usize,
    pub size: usize,
}

impl PageParams {
    /// `from` vaut 0 par défaut, `size` la taille configurée.
    /// Valeurs non numériques ou négatives : `Validation`. `size` est plafonné.
    pub fn parse(from: Option<&str>, size: Option<&str>, cfg: &RevisionsConfig) -> Result<Self> {
        let from = parse_param("from", from)?.unwrap_or(0);
        let size = parse_param("size", size)?
            .unwrap_or(cfg.default_page_size)
            .min(cfg.max_page_size);
        Ok(Self { from, size })
    }

    /// Nombre de révisions à demander à chaque table
    pub fn window(&self) -> usize {
        self.from.saturating_add(self.size)
    }
}

fn parse_param(name: &str, raw: Option<&str>) -> Result<Option<usize>> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse::<usize>().map(Some).map_err(|_| {
            AppError::Validation(format!("paramètre '{}' invalide : '{}'", name, v))
        }),
    }
}

/// Plus récent d'abord ; à date égale, id décroissant puis type d'entité.
fn recency(a: &Revision, b: &Revision) -> Ordering {
    b.created_at
        .cmp(&a.created_at)
        .then_with(|| b.id.cmp(&a.id))
        .then_with(|| b.entity_type.cmp(&a.entity_type))
}

/// Fusionne les flux par type, ordonne et découpe la page.
pub fn assemble(streams: Vec<Vec<Revision>>, page: PageParams) -> Vec<Revision> {
    let mut merged: Vec<Revision> = streams.into_iter().flatten().collect();
    merged.sort_by(recency);
    merged.into_iter().skip(page.from).take(page.size).collect()
}

/// Page de révisions toutes entités confondues.
pub async fn list_page(store: &RevisionStore<'_>, page: PageParams) -> Result<Vec<Revision>> {
    if page.size == 0 {
        return Ok(Vec::new());
    }
    let window = page.window();
    let streams = try_join_all(EntityType::ALL.iter().map(|t| store.recent(*t, window))).await?;
    Ok(assemble(streams, page))
}
