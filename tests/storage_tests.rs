//! FileStorage behavior and persistence across controller restarts.

use std::fs;
use std::sync::Arc;
use tempfile::TempDir;
use vark_results::auth::encode_unsigned;
use vark_results::{
    AppConfig, AppController, FileStorage, IdentityClaims, NoFederatedProvider, QuizInput,
    StoragePort,
};

fn controller(dir: &TempDir) -> AppController {
    AppController::new(
        AppConfig::default(),
        Arc::new(FileStorage::new(dir.path())),
        Arc::new(NoFederatedProvider),
    )
}

#[tokio::test]
async fn test_get_missing_key_is_none() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("not-created-yet"));
    assert_eq!(storage.get("vark_user_session").await.unwrap(), None);
    // removing an absent key is fine too
    storage.remove("vark_user_session").await.unwrap();
}

#[tokio::test]
async fn test_set_get_remove() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path().join("profile"));

    storage
        .set("vark_results_maria@escola.pr.gov.br", "[]".to_string())
        .await
        .unwrap();
    assert!(storage
        .path_for("vark_results_maria@escola.pr.gov.br")
        .exists());
    assert_eq!(
        storage
            .get("vark_results_maria@escola.pr.gov.br")
            .await
            .unwrap()
            .as_deref(),
        Some("[]")
    );

    storage
        .remove("vark_results_maria@escola.pr.gov.br")
        .await
        .unwrap();
    assert_eq!(
        storage.get("vark_results_maria@escola.pr.gov.br").await.unwrap(),
        None
    );
}

#[test]
fn test_keys_cannot_escape_root() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let path = storage.path_for("../../etc/passwd");
    assert_eq!(path.parent(), Some(dir.path()));
}

#[tokio::test]
async fn test_session_and_history_survive_restart() {
    let dir = TempDir::new().unwrap();
    let token = encode_unsigned(&IdentityClaims {
        email: "maria@escola.pr.gov.br".to_string(),
        name: Some("Maria".to_string()),
        picture: None,
    });

    {
        let app = controller(&dir);
        app.sign_in_federated(&token).await.unwrap();
        app.submit(QuizInput::new("Maria", "7", "3", "3", "3"))
            .await
            .unwrap();
    }

    let app = controller(&dir);
    let identity = app.refresh().await.unwrap();
    assert_eq!(identity.email, "maria@escola.pr.gov.br");
    assert_eq!(identity.display_name, "Maria");

    let history = app.history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].percentages.a, "43.8");
    assert_eq!(history[0].percentages.b, "18.8");
    // the transient result is not restored
    assert!(app.current_result().is_none());
}

#[tokio::test]
async fn test_malformed_session_file_is_discarded() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    fs::write(storage.path_for("vark_user_session"), "{broken").unwrap();

    let app = controller(&dir);
    assert_eq!(app.refresh().await, None);
    assert!(!storage.path_for("vark_user_session").exists());
}

#[tokio::test]
async fn test_logout_removes_session_file_only() {
    let dir = TempDir::new().unwrap();
    let storage = FileStorage::new(dir.path());
    let token = encode_unsigned(&IdentityClaims {
        email: "joao@escola.pr.gov.br".to_string(),
        name: None,
        picture: None,
    });

    let app = controller(&dir);
    app.sign_in_federated(&token).await.unwrap();
    app.submit(QuizInput::new("João", "4", "4", "4", "4"))
        .await
        .unwrap();
    app.logout().await.unwrap();

    assert!(!storage.path_for("vark_user_session").exists());
    assert!(storage
        .path_for("vark_results_joao@escola.pr.gov.br")
        .exists());
}

#[tokio::test]
async fn test_similar_emails_keep_separate_histories() {
    let dir = TempDir::new().unwrap();
    let token = |email: &str| {
        encode_unsigned(&IdentityClaims {
            email: email.to_string(),
            name: None,
            picture: None,
        })
    };

    let app = controller(&dir);
    app.sign_in_federated(&token("ana+x@escola.pr.gov.br"))
        .await
        .unwrap();
    app.submit(QuizInput::new("Ana", "4", "4", "4", "4"))
        .await
        .unwrap();
    app.logout().await.unwrap();

    app.sign_in_federated(&token("ana_x@escola.pr.gov.br"))
        .await
        .unwrap();
    assert!(app.history().is_empty());

    let storage = FileStorage::new(dir.path());
    assert_ne!(
        storage.path_for("vark_results_ana+x@escola.pr.gov.br"),
        storage.path_for("vark_results_ana_x@escola.pr.gov.br")
    );
}
