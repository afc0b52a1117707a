// FICHIER : server/tests/bookshelf_suite/revisions_http.rs

use crate::common::{setup_test_app, TestApp, ALICE, BOB};
use axum::http::{Method, StatusCode};
use bookshelf::catalog::EntityType;
use bookshelf::revisions::NewRevision;
use bookshelf::utils::prelude::*;
use chrono::{Duration, TimeZone};

/// `count` révisions, une minute d'écart, types en alternance
async fn seed_revisions(app: &TestApp, count: i64) {
    let start = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    let store = app.state.revisions();
    for i in 0..count {
        let entity_type = EntityType::ALL[(i as usize) % EntityType::ALL.len()];
        store
            .append(NewRevision {
                entity_type,
                entity_bbid: format!("bbid-{}", i),
                author_id: if i % 2 == 0 { ALICE } else { BOB },
                note: (i % 3 == 0).then(|| format!("note <{}>", i)),
                created_at: Some(start + Duration::minutes(i)),
            })
            .await
            .expect("append revision");
    }
}

fn ids(page: &Value) -> Vec<i64> {
    page.as_array()
        .expect("array")
        .iter()
        .map(|r| r["id"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_revisions_are_paged_newest_first() {
    let app = setup_test_app().await;
    seed_revisions(&app, 35).await;

    let (status, first) = app.send(Method::GET, "/revisions", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let first = ids(&first);
    assert_eq!(first.len(), 20);
    assert_eq!(first[0], 35);
    assert_eq!(first[19], 16);

    let (_, second) = app
        .send(Method::GET, "/revisions?from=20&size=20", None, None)
        .await;
    let second = ids(&second);
    assert_eq!(second.len(), 15);
    assert_eq!(second, (1..=15).rev().collect::<Vec<_>>());

    let (_, past_end) = app
        .send(Method::GET, "/revisions?from=100", None, None)
        .await;
    assert!(ids(&past_end).is_empty());
}

#[tokio::test]
async fn test_revision_entries_carry_entity_details() {
    let app = setup_test_app().await;
    seed_revisions(&app, 6).await;

    let (_, page) = app.send(Method::GET, "/revisions?size=1", None, None).await;
    let latest = &page[0];
    assert_eq!(latest["id"], 6);
    assert_eq!(latest["entityType"], "Author");
    assert_eq!(latest["entityBbid"], "bbid-5");
    assert_eq!(latest["authorId"], BOB);
    assert_eq!(latest["createdAt"], "2024-03-01T12:05:00.000Z");
}

#[tokio::test]
async fn test_invalid_page_params_are_rejected() {
    let app = setup_test_app().await;

    for uri in ["/revisions?from=abc", "/revisions?size=-1", "/?size=x"] {
        let (status, _) = app.send(Method::GET, uri, None, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", uri);
    }

    let (status, body) = app.send(Method::GET, "/revisions?size=0", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_revisions_page_renders_layout_and_props() {
    let app = setup_test_app().await;
    seed_revisions(&app, 25).await;

    let (status, html) = app.send_raw(Method::GET, "/", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(html.contains("<title>RevisionsPage</title>"));
    assert!(html.contains(r#"<script src="/js/revisions.js"></script>"#));
    assert!(html.contains("Older &rarr;"));
    assert!(!html.contains("&larr; Newer"));

    // Props : JSON neutralisé pour la balise <script>
    assert!(html.contains(r#""from":0"#));
    assert!(html.contains(r#""size":20"#));
    assert!(html.contains(r#"note \u003c24\u003e"#));
    assert!(html.contains("note &lt;24&gt;"));
    assert!(!html.contains("note <24>"));

    let (_, last) = app.send_raw(Method::GET, "/?from=20", None, None).await;
    assert!(last.contains("&larr; Newer"));
    assert!(!last.contains("Older &rarr;"));
}
