// FICHIER : server/tests/bookshelf_suite/collections_http.rs

use crate::common::{collection_body, setup_test_app, setup_with_indexer, ALICE, BOB, CAROL};
use axum::http::StatusCode;
use bookshelf::search::{SearchIndexer, SearchProjection};
use bookshelf::utils::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Indexeur de test : compte les appels, renvoie la projection
#[derive(Default)]
struct CountingIndexer {
    calls: AtomicUsize,
}

#[async_trait]
impl SearchIndexer for CountingIndexer {
    fn name(&self) -> &'static str {
        "counting"
    }

    async fn index_entity(&self, projection: &SearchProjection) -> Result<Value> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(serde_json::to_value(projection)?)
    }
}

struct DownIndexer;

#[async_trait]
impl SearchIndexer for DownIndexer {
    fn name(&self) -> &'static str {
        "down"
    }

    async fn index_entity(&self, _projection: &SearchProjection) -> Result<Value> {
        Err(AppError::Indexing("connection refused".into()))
    }
}

#[tokio::test]
async fn test_create_returns_projection_and_persists() {
    let app = setup_test_app().await;

    let (status, body) = app
        .create(ALICE, collection_body("  Favourite Works ", "Work", &[(BOB, "bob")]))
        .await;
    assert_eq!(status, StatusCode::OK, "body: {}", body);
    assert_eq!(body["type"], "Collection");
    assert_eq!(body["aliasSet"]["aliases"][0]["name"], "Favourite Works");
    let id = body["id"].as_str().expect("id").to_string();
    assert_eq!(body["bbid"], id);

    let (status, shown) = app.show(Some(ALICE), &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["name"], "Favourite Works");
    assert_eq!(shown["ownerId"], ALICE);
    assert_eq!(shown["entityType"], "Work");
    assert_eq!(shown["public"], true);
    assert_eq!(shown["collaborators"], json!([{ "id": BOB, "name": "bob" }]));
}

#[tokio::test]
async fn test_entity_type_is_normalized() {
    let app = setup_test_app().await;

    for raw in ["edition-group", "edition_group", "Edition Group", "EditionGroup"] {
        let (status, body) = app.create(ALICE, collection_body("Groups", raw, &[])).await;
        assert_eq!(status, StatusCode::OK, "{} -> {}", raw, body);
        let id = body["id"].as_str().unwrap();
        let (_, shown) = app.show(Some(ALICE), id).await;
        assert_eq!(shown["entityType"], "EditionGroup");
    }
}

#[tokio::test]
async fn test_invalid_submissions_are_rejected() {
    let app = setup_test_app().await;

    let (status, body) = app.create(ALICE, collection_body("   ", "Work", &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("nom"));

    let (status, _) = app.create(ALICE, collection_body("X", "Series", &[])).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .create(ALICE, json!({ "name": "No type", "privacy": "Public" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .create(ALICE, collection_body("X", "Work", &[(404, "ghost")]))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // Rien n'a été écrit
    let all = app.state.collections().repository().list_collections().await.unwrap();
    assert!(all.is_empty());
}

#[tokio::test]
async fn test_placeholder_rows_are_ignored() {
    let app = setup_test_app().await;
    let body = json!({
        "name": "Sparse",
        "privacy": "Public",
        "entityType": "Author",
        "collaborators": [{ "id": null, "name": "" }, { "id": CAROL, "name": "carol" }],
    });

    let (status, created) = app.create(ALICE, body).await;
    assert_eq!(status, StatusCode::OK);
    let (_, shown) = app.show(None, created["id"].as_str().unwrap()).await;
    assert_eq!(shown["collaborators"], json!([{ "id": CAROL, "name": "carol" }]));
}

#[tokio::test]
async fn test_edit_syncs_collaborators_without_reindex() {
    let indexer = Arc::new(CountingIndexer::default());
    let shared = indexer.clone();
    let app = setup_with_indexer(move |_, _| shared as Arc<dyn SearchIndexer>).await;

    let (_, created) = app
        .create(ALICE, collection_body("Shelf", "Edition", &[(BOB, "bob")]))
        .await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(indexer.calls.load(Ordering::SeqCst), 1);

    // Même nom : pas de réindexation, la collection complète est renvoyée
    let (status, edited) = app
        .edit(ALICE, &id, collection_body("Shelf", "Edition", &[(CAROL, "carol")]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(indexer.calls.load(Ordering::SeqCst), 1);
    assert_eq!(edited["id"], id);
    assert_eq!(edited["collaborators"], json!([{ "id": CAROL, "name": "carol" }]));

    // Renommage : réindexation et projection en réponse
    let (status, renamed) = app
        .edit(CAROL, &id, collection_body("Shelf II", "Edition", &[(CAROL, "carol")]))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(indexer.calls.load(Ordering::SeqCst), 2);
    assert_eq!(renamed["aliasSet"]["aliases"][0]["name"], "Shelf II");

    // L'auteur d'origine reste propriétaire
    let (_, shown) = app.show(Some(ALICE), &id).await;
    assert_eq!(shown["ownerId"], ALICE);
    assert_eq!(shown["name"], "Shelf II");
}

#[tokio::test]
async fn test_indexing_failure_keeps_saved_collection() {
    let app = setup_with_indexer(|_, _| Arc::new(DownIndexer) as Arc<dyn SearchIndexer>).await;

    let (status, body) = app.create(ALICE, collection_body("Unindexed", "Publisher", &[])).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));

    let saved = app.state.collections().repository().list_collections().await.unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name, "Unindexed");
}

#[tokio::test]
async fn test_renamed_collaborator_keeps_its_place() {
    let app = setup_test_app().await;
    let (_, created) = app
        .create(
            ALICE,
            collection_body("Ordered", "Work", &[(BOB, "bob"), (CAROL, "carol")]),
        )
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, edited) = app
        .edit(
            ALICE,
            &id,
            collection_body("Ordered", "Work", &[(BOB, "Bobby"), (CAROL, "carol")]),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<i64> = edited["collaborators"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![BOB, CAROL]);
}
