// FICHIER : server/src/editor/debouncer.rs

use super::identifier_editor::{DebounceHint, Dispatch, IdentifierAction};
use std::collections::HashMap;
use std::time::{Duration, Instant};

pub const DEFAULT_KEYSTROKE_WINDOW: Duration = Duration::from_millis(500);

/// Regroupe les actions marquées `keystroke` : par ligne, seule la dernière
/// frappe est émise une fois la fenêtre écoulée sans nouvelle frappe.
#[derive(Debug)]
pub struct KeystrokeDebouncer {
    window: Duration,
    // clé = ligne ; valeur = (dernière frappe, action en attente)
    pending: HashMap<String, (Instant, IdentifierAction)>,
}

impl Default for KeystrokeDebouncer {
    fn default() -> Self {
        Self::new(DEFAULT_KEYSTROKE_WINDOW)
    }
}

impl KeystrokeDebouncer {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            pending: HashMap::new(),
        }
    }

    /// Renvoie les actions à appliquer immédiatement.
    pub fn push(&mut self, dispatch: Dispatch, now: Instant) -> Vec<IdentifierAction> {
        match (dispatch.debounce, dispatch.action.row_id()) {
            (Some(DebounceHint::Keystroke), Some(row)) => {
                self.pending
                    .insert(row.to_string(), (now, dispatch.action));
                Vec::new()
            }
            _ => {
                // Une suppression annule la frappe en attente sur la même ligne
                if let IdentifierAction::RemoveRow(row) = &dispatch.action {
                    self.pending.remove(row);
                }
                vec![dispatch.action]
            }
        }
    }

    /// Actions dont la fenêtre est écoulée
    pub fn flush_due(&mut self, now: Instant) -> Vec<IdentifierAction> {
        let window = self.window;
        let mut due: Vec<(Instant, String)> = self
            .pending
            .iter()
            .filter(|(_, (at, _))| now.saturating_duration_since(*at) >= window)
            .map(|(row, (at, _))| (*at, row.clone()))
            .collect();
        due.sort();

        due.into_iter()
            .filter_map(|(_, row)| self.pending.remove(&row).map(|(_, action)| action))
            .collect()
    }

    /// Vide tout (fermeture de l'éditeur)
    pub fn flush_all(&mut self) -> Vec<IdentifierAction> {
        let mut all: Vec<(Instant, IdentifierAction)> =
            self.pending.drain().map(|(_, entry)| entry).collect();
        all.sort_by_key(|(at, _)| *at);
        all.into_iter().map(|(_, action)| action).collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}
