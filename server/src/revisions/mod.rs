// FICHIER : server/src/revisions/mod.rs

pub mod model;
pub mod paginator;
pub mod store;

pub use model::{NewRevision, Revision};
pub use paginator::{list_page, PageParams};
pub use store::RevisionStore;
