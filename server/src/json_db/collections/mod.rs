//! Gestionnaire de collections JSON

pub mod collection;
pub mod manager;

pub use manager::CollectionsManager;
