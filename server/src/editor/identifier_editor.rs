// FICHIER : server/src/editor/identifier_editor.rs

use serde::{Deserialize, Serialize};

/// Indication de regroupement attachée à une action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DebounceHint {
    Keystroke,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum IdentifierAction {
    #[serde(rename = "ADD_IDENTIFIER_ROW")]
    AddRow(String),
    #[serde(rename = "REMOVE_IDENTIFIER_ROW")]
    RemoveRow(String),
    #[serde(rename = "UPDATE_IDENTIFIER_TYPE", rename_all = "camelCase")]
    UpdateType { row_id: String, value: i64 },
    #[serde(rename = "UPDATE_IDENTIFIER_VALUE", rename_all = "camelCase")]
    UpdateValue {
        row_id: String,
        value: String,
        suggested_type: Option<i64>,
    },
    #[serde(rename = "HIDE_IDENTIFIER_EDITOR")]
    Hide,
}

impl IdentifierAction {
    /// Ligne concernée, le cas échéant
    pub fn row_id(&self) -> Option<&str> {
        match self {
            IdentifierAction::AddRow(id) | IdentifierAction::RemoveRow(id) => Some(id),
            IdentifierAction::UpdateType { row_id, .. }
            | IdentifierAction::UpdateValue { row_id, .. } => Some(row_id),
            IdentifierAction::Hide => None,
        }
    }
}

/// Action accompagnée de ses métadonnées
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    #[serde(flatten)]
    pub action: IdentifierAction,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub debounce: Option<DebounceHint>,
}

impl From<IdentifierAction> for Dispatch {
    fn from(action: IdentifierAction) -> Self {
        Self {
            action,
            debounce: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentifierRow {
    pub id: String,
    pub type_id: Option<i64>,
    pub value: String,
}

/// Store de l'éditeur d'identifiants. Il possède le compteur des lignes
/// nouvelles : un nouvel éditeur repart de `n0`.
#[derive(Debug, Default)]
pub struct IdentifierEditorStore {
    next_row_id: u64,
    rows: Vec<IdentifierRow>,
    hidden: bool,
}

impl IdentifierEditorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reprend des identifiants déjà enregistrés (ids serveur)
    pub fn with_rows(rows: Vec<IdentifierRow>) -> Self {
        Self {
            rows,
            ..Self::default()
        }
    }

    pub fn rows(&self) -> &[IdentifierRow] {
        &self.rows
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    // --- CRÉATEURS D'ACTIONS ---

    /// Le préfixe `n` évite toute collision avec les ids serveur.
    pub fn add_row(&mut self) -> Dispatch {
        let id = format!("n{}", self.next_row_id);
        self.next_row_id += 1;
        IdentifierAction::AddRow(id).into()
    }

    pub fn remove_row(row_id: &str) -> Dispatch {
        IdentifierAction::RemoveRow(row_id.to_string()).into()
    }

    pub fn update_type(row_id: &str, value: i64) -> Dispatch {
        IdentifierAction::UpdateType {
            row_id: row_id.to_string(),
            value,
        }
        .into()
    }

    pub fn debounced_update_value(row_id: &str, value: &str, suggested_type: Option<i64>) -> Dispatch {
        Dispatch {
            action: IdentifierAction::UpdateValue {
                row_id: row_id.to_string(),
                value: value.to_string(),
                suggested_type,
            },
            debounce: Some(DebounceHint::Keystroke),
        }
    }

    pub fn hide() -> Dispatch {
        IdentifierAction::Hide.into()
    }

    // --- RÉDUCTEUR ---

    pub fn reduce(&mut self, action: &IdentifierAction) {
        match action {
            IdentifierAction::AddRow(id) => self.rows.push(IdentifierRow {
                id: id.clone(),
                ..IdentifierRow::default()
            }),
            IdentifierAction::RemoveRow(id) => self.rows.retain(|r| &r.id != id),
            IdentifierAction::UpdateType { row_id, value } => {
                if let Some(row) = self.row_mut(row_id) {
                    row.type_id = Some(*value);
                }
            }
            IdentifierAction::UpdateValue {
                row_id,
                value,
                suggested_type,
            } => {
                if let Some(row) = self.row_mut(row_id) {
                    row.value = value.clone();
                    // La suggestion ne remplace jamais un type choisi
                    if row.type_id.is_none() {
                        row.type_id = *suggested_type;
                    }
                }
            }
            IdentifierAction::Hide => self.hidden = true,
        }
    }

    fn row_mut(&mut self, row_id: &str) -> Option<&mut IdentifierRow> {
        self.rows.iter_mut().find(|r| r.id == row_id)
    }
}
