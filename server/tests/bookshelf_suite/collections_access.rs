// FICHIER : server/tests/bookshelf_suite/collections_access.rs

use crate::common::{collection_body, setup_test_app, ALICE, BOB, CAROL};
use axum::http::{Method, StatusCode};
use bookshelf::utils::prelude::*;

#[tokio::test]
async fn test_missing_or_unknown_editor_is_unauthorized() {
    let app = setup_test_app().await;
    let body = collection_body("Anon", "Work", &[]);

    let (status, _) = app
        .send(Method::POST, "/collection/create/handler", None, Some(body.clone()))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/collection/create/handler",
            Some("not-a-number"),
            Some(body.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app.create(999, body).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_edit_unknown_collection_is_not_found() {
    let app = setup_test_app().await;
    let (status, body) = app
        .edit(ALICE, "does-not-exist", collection_body("X", "Work", &[]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_only_members_can_edit() {
    let app = setup_test_app().await;
    let (_, created) = app
        .create(ALICE, collection_body("Team", "Work", &[(BOB, "bob")]))
        .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .edit(CAROL, &id, collection_body("Hijacked", "Work", &[(CAROL, "carol")]))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Un collaborateur peut modifier
    let (status, _) = app
        .edit(BOB, &id, collection_body("Team", "Work", &[(BOB, "bob")]))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, shown) = app.show(None, &id).await;
    assert_eq!(shown["name"], "Team");
}

#[tokio::test]
async fn test_private_collection_is_hidden_from_outsiders() {
    let app = setup_test_app().await;
    let mut body = collection_body("Secret", "Author", &[(BOB, "bob")]);
    body["privacy"] = json!("Private");

    let (status, created) = app.create(ALICE, body).await;
    assert_eq!(status, StatusCode::OK);
    let id = created["id"].as_str().unwrap().to_string();

    assert_eq!(app.show(None, &id).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.show(Some(CAROL), &id).await.0, StatusCode::NOT_FOUND);

    let (status, shown) = app.show(Some(BOB), &id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["public"], false);
}

#[tokio::test]
async fn test_unknown_privacy_label_means_private() {
    let app = setup_test_app().await;
    let mut body = collection_body("Odd", "Work", &[]);
    body["privacy"] = json!("public");

    let (_, created) = app.create(ALICE, body).await;
    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(app.show(None, &id).await.0, StatusCode::NOT_FOUND);
    assert_eq!(app.show(Some(ALICE), &id).await.1["public"], false);
}

#[tokio::test]
async fn test_path_ids_never_leave_the_collection_table() {
    let app = setup_test_app().await;
    app.create(ALICE, collection_body("Anchor", "Work", &[])).await;

    for id in ["..%2F..%2F_system", "..%2Feditor%2F1", "..", "not-a-uuid"] {
        let (status, body) = app.show(Some(ALICE), id).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", id);
        assert!(body.get("ownerId").is_none());

        let (status, _) = app
            .edit(ALICE, id, collection_body("X", "Work", &[]))
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", id);
    }
}

#[tokio::test]
async fn test_private_collection_edit_by_outsider_is_not_found() {
    let app = setup_test_app().await;
    let mut body = collection_body("Hidden", "Work", &[]);
    body["privacy"] = json!("Private");
    let (_, created) = app.create(ALICE, body).await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, _) = app
        .edit(CAROL, &id, collection_body("Guess", "Work", &[]))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
