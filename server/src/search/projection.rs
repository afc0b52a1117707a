// FICHIER : server/src/search/projection.rs

use crate::catalog::model::Collection;
use serde::{Deserialize, Serialize};

pub const COLLECTION_DOC_TYPE: &str = "Collection";

/// Vue minimale d'une entité pour le moteur de recherche.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchProjection {
    pub alias_set: AliasSet,
    pub bbid: String,
    pub id: String,
    #[serde(rename = "type")]
    pub doc_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AliasSet {
    pub aliases: Vec<Alias>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub name: String,
}

impl SearchProjection {
    pub fn from_collection(collection: &Collection) -> Self {
        Self {
            alias_set: AliasSet {
                aliases: vec![Alias {
                    name: collection.name.clone(),
                }],
            },
            bbid: collection.id.clone(),
            id: collection.id.clone(),
            doc_type: COLLECTION_DOC_TYPE.to_string(),
        }
    }
}
