// FICHIER : server/tests/common/mod.rs

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use bookshelf::catalog::Editor;
use bookshelf::json_db::storage::{JsonDbConfig, StorageEngine};
use bookshelf::routes;
use bookshelf::search::{JsonDbIndexer, SearchIndexer};
use bookshelf::utils::config::{AppConfig, PATH_DOMAIN};
use bookshelf::utils::prelude::*;
use std::sync::{Arc, Once};
use tempfile::TempDir;
use tower::ServiceExt;

static INIT: Once = Once::new();

pub const ALICE: i64 = 1;
pub const BOB: i64 = 2;
pub const CAROL: i64 = 3;

#[allow(dead_code)]
pub struct TestApp {
    pub state: Arc<bookshelf::AppState>,
    pub router: Router,
    pub _tmp_dir: TempDir,
}

/// Service complet sur une base isolée, indexeur json_db.
pub async fn setup_test_app() -> TestApp {
    setup_with_indexer(|storage, config| {
        Arc::new(JsonDbIndexer::new(
            storage.clone(),
            &config.database.space,
            &config.database.db,
        )) as Arc<dyn SearchIndexer>
    })
    .await
}

pub async fn setup_with_indexer<F>(make_indexer: F) -> TestApp
where
    F: FnOnce(&StorageEngine, &AppConfig) -> Arc<dyn SearchIndexer>,
{
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    });

    // Dossier UNIQUE par test
    let tmp_dir = tempfile::Builder::new()
        .prefix("bookshelf_it_")
        .tempdir()
        .expect("❌ Impossible de créer le dossier temporaire");

    let mut config = AppConfig::create_default_test_config();
    config.paths.insert(
        PATH_DOMAIN.to_string(),
        tmp_dir.path().to_string_lossy().to_string(),
    );

    let storage = StorageEngine::new(JsonDbConfig::new(tmp_dir.path().to_path_buf()));
    let indexer = make_indexer(&storage, &config);
    let state = bookshelf::AppState::with_indexer(config, storage, indexer)
        .await
        .expect("bootstrap failed");

    let state = Arc::new(state);
    for (id, name) in [(ALICE, "alice"), (BOB, "bob"), (CAROL, "carol")] {
        state
            .collections()
            .repository()
            .save_editor(&Editor {
                id,
                name: name.to_string(),
            })
            .await
            .expect("seed editor");
    }

    TestApp {
        router: routes::router(state.clone()),
        state,
        _tmp_dir: tmp_dir,
    }
}

#[allow(dead_code)]
impl TestApp {
    /// Requête JSON ; le corps de réponse est décodé (chaîne brute si non JSON).
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        editor: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let (status, text) = self.send_raw(method, uri, editor, body).await;
        let value = serde_json::from_str(&text).unwrap_or(Value::String(text));
        (status, value)
    }

    pub async fn send_raw(
        &self,
        method: Method,
        uri: &str,
        editor: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, String) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(id) = editor {
            builder = builder.header("x-editor-id", id);
        }
        let request = match body {
            Some(json) => builder
                .header("content-type", "application/json")
                .body(Body::from(json.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("oneshot");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        (status, String::from_utf8_lossy(&bytes).to_string())
    }

    pub async fn create(&self, editor: i64, body: Value) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            "/collection/create/handler",
            Some(&editor.to_string()),
            Some(body),
        )
        .await
    }

    pub async fn edit(&self, editor: i64, id: &str, body: Value) -> (StatusCode, Value) {
        self.send(
            Method::POST,
            &format!("/collection/{}/edit/handler", id),
            Some(&editor.to_string()),
            Some(body),
        )
        .await
    }

    pub async fn show(&self, editor: Option<i64>, id: &str) -> (StatusCode, Value) {
        let header = editor.map(|e| e.to_string());
        self.send(
            Method::GET,
            &format!("/collection/{}", id),
            header.as_deref(),
            None,
        )
        .await
    }
}

/// Corps de formulaire minimal
#[allow(dead_code)]
pub fn collection_body(name: &str, entity_type: &str, collaborators: &[(i64, &str)]) -> Value {
    json!({
        "name": name,
        "description": "",
        "privacy": "Public",
        "entityType": entity_type,
        "collaborators": collaborators
            .iter()
            .map(|(id, name)| json!({ "id": id, "name": name }))
            .collect::<Vec<_>>(),
    })
}
