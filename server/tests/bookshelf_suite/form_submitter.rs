// FICHIER : server/tests/bookshelf_suite/form_submitter.rs

use crate::common::{setup_test_app, TestApp, ALICE, BOB, CAROL};
use bookshelf::catalog::Collaborator;
use bookshelf::editor::form::{CollectionForm, FormOutcome, FormSubmitter, INCOMPLETE_FORM};

/// Lance le routeur sur un port éphémère et renvoie l'URL de base.
async fn serve(app: &TestApp) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    let router = app.router.clone();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{}", addr)
}

fn collection_id(outcome: &FormOutcome) -> String {
    match outcome {
        FormOutcome::Redirect(path) => path
            .strip_prefix("/collection/")
            .expect("redirect path")
            .to_string(),
        other => panic!("redirection attendue, reçu {:?}", other),
    }
}

#[tokio::test]
async fn test_form_create_then_edit_roundtrip() {
    let app = setup_test_app().await;
    let base = serve(&app).await;
    let submitter = FormSubmitter::new(&base, ALICE);

    let mut form = CollectionForm::new();
    form.name = "Reading list".into();
    form.entity_type = Some("edition-group".into());
    form.set_collaborator(
        0,
        Some(Collaborator {
            id: BOB,
            name: "bob".into(),
        }),
    );
    form.add_collaborator_row();

    let outcome = submitter.submit(&mut form).await;
    let id = collection_id(&outcome);
    assert!(form.error_text.is_none());

    // Rechargement en mode édition
    let existing = app
        .state
        .collections()
        .show(Some(ALICE), &id)
        .await
        .expect("collection saved");
    assert_eq!(existing.collection.entity_type.as_str(), "EditionGroup");

    let mut edit_form = CollectionForm::edit(&existing);
    assert_eq!(edit_form.submit_label(), "UPDATE");
    edit_form.description = "Shared with carol".into();
    edit_form.set_collaborator(
        0,
        Some(Collaborator {
            id: CAROL,
            name: "carol".into(),
        }),
    );

    let outcome = submitter.submit(&mut edit_form).await;
    assert_eq!(outcome, FormOutcome::Redirect(format!("/collection/{}", id)));

    let reloaded = app.state.collections().show(Some(ALICE), &id).await.unwrap();
    assert_eq!(reloaded.collection.description.as_deref(), Some("Shared with carol"));
    assert_eq!(
        reloaded.collaborators,
        vec![Collaborator {
            id: CAROL,
            name: "carol".into()
        }]
    );
}

#[tokio::test]
async fn test_form_surfaces_server_errors() {
    let app = setup_test_app().await;
    let base = serve(&app).await;

    let mut form = CollectionForm::new();
    form.name = "Mine".into();
    form.entity_type = Some("Work".into());
    let id = collection_id(&FormSubmitter::new(&base, ALICE).submit(&mut form).await);

    let existing = app.state.collections().show(Some(ALICE), &id).await.unwrap();
    let mut intruder_form = CollectionForm::edit(&existing);
    intruder_form.name = "Taken over".into();

    match FormSubmitter::new(&base, CAROL).submit(&mut intruder_form).await {
        FormOutcome::Failed(text) => {
            assert!(text.starts_with("Internal Error: "));
            assert_eq!(intruder_form.error_text.as_deref(), Some(text.as_str()));
        }
        other => panic!("échec attendu, reçu {:?}", other),
    }

    // Formulaire incomplet : rien n'est envoyé
    intruder_form.name = "  ".into();
    assert_eq!(
        FormSubmitter::new(&base, CAROL).submit(&mut intruder_form).await,
        FormOutcome::Invalid
    );
    assert_eq!(intruder_form.error_text.as_deref(), Some(INCOMPLETE_FORM));
}
