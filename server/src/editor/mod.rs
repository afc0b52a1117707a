// FICHIER : server/src/editor/mod.rs

//! État côté client : formulaire de collection et éditeur d'identifiants.

pub mod debouncer;
pub mod form;
pub mod identifier_editor;

pub use debouncer::KeystrokeDebouncer;
pub use form::{CollectionForm, FormOutcome, FormSubmitter};
pub use identifier_editor::{Dispatch, IdentifierAction, IdentifierEditorStore};
