// FICHIER : server/src/revisions/model.rs

use crate::catalog::model::EntityType;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Révision d'une entité du catalogue (ajout seulement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    pub id: i64,
    pub entity_type: EntityType,
    pub entity_bbid: String,
    pub author_id: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

/// Saisie d'une révision ; l'id est attribué par le store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRevision {
    pub entity_type: EntityType,
    pub entity_bbid: String,
    pub author_id: i64,
    #[serde(default)]
    pub note: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Horodatage RFC3339 à largeur fixe (millisecondes, suffixe Z) :
/// l'ordre lexicographique des chaînes suit l'ordre chronologique.
pub mod timestamp {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn format(at: &DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&format(at))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }
}
