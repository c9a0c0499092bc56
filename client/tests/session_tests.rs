//! Session tests against a real in-process API server.

use std::sync::Arc;
use std::time::Duration;

use petition_client::{
    view, ClientConfig, ClientError, PetitionSession, VerificationOutcome, ViewState,
};
use petition_nullables::{NullVerifier, NullWidget};
use petition_rpc::{router, ApiMetrics, AppState};
use petition_store::{MemoryPetitionStore, PetitionStore};

struct Server {
    url: String,
    store: Arc<MemoryPetitionStore>,
    verifier: Arc<NullVerifier>,
}

async fn spawn_server(verifier: NullVerifier) -> Server {
    let store = Arc::new(MemoryPetitionStore::new());
    let verifier = Arc::new(verifier);
    let state = AppState::new(
        Arc::clone(&store),
        Some(Arc::clone(&verifier)),
        Arc::new(ApiMetrics::new().unwrap()),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(petition_rpc::serve(
        listener,
        router(state, false),
        std::future::pending(),
    ));
    Server {
        url: format!("http://{addr}"),
        store,
        verifier,
    }
}

fn config(url: &str) -> ClientConfig {
    ClientConfig::new(url, Some("app_staging_test"), Some("create-petition")).unwrap()
}

#[tokio::test]
async fn verified_person_creates_a_petition() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let proof = NullWidget::sample_proof(7);
    let mut session =
        PetitionSession::new(config(&server.url), NullWidget::completing(proof.clone())).unwrap();

    session.refresh().await.unwrap();
    assert!(session.view().petitions.is_empty());
    assert!(!session.view().loading);

    let outcome = session.verify(std::future::pending()).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Verified {
            nullifier_hash: proof.nullifier_hash.clone()
        }
    );
    assert_eq!(session.view().state, ViewState::FormVisible);
    assert_eq!(server.verifier.seen(), vec![proof]);

    session.set_title("Ban plastic bags");
    session.set_description("Reduce waste");
    let created = session.submit().await.unwrap();
    assert_eq!(created.signatures, 0);

    let view_model = session.view();
    assert_eq!(view_model.state, ViewState::Idle);
    assert!(view_model.title.is_empty());
    assert!(view_model.description.is_empty());
    assert_eq!(view_model.petitions, vec![created.clone()]);
    assert_eq!(view_model.notice.as_deref(), Some("Petition created!"));
    assert_eq!(server.store.list().unwrap(), vec![created]);

    let text = view::render(view_model);
    assert!(text.contains("Ban plastic bags"));
    assert!(!text.contains("Title:"));
}

#[tokio::test]
async fn rejected_proof_keeps_form_locked() {
    let server = spawn_server(NullVerifier::rejecting("already verified")).await;
    let mut session = PetitionSession::new(
        config(&server.url),
        NullWidget::completing(NullWidget::sample_proof(1)),
    )
    .unwrap();

    let outcome = session.verify(std::future::pending()).await.unwrap();
    assert_eq!(
        outcome,
        VerificationOutcome::Failed("already verified".to_string())
    );
    assert_eq!(session.view().state, ViewState::Idle);
    assert_eq!(
        session.view().notice.as_deref(),
        Some("Verification failed: already verified")
    );

    session.set_title("t");
    session.set_description("d");
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, ClientError::Flow(_)));
    assert_eq!(server.store.count().unwrap(), 0);
}

#[tokio::test]
async fn dismissed_widget_never_reaches_the_server() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let mut session =
        PetitionSession::new(config(&server.url), NullWidget::dismissing()).unwrap();

    let outcome = session.verify(std::future::pending()).await.unwrap();
    assert_eq!(outcome, VerificationOutcome::Cancelled);
    assert_eq!(session.view().state, ViewState::Idle);
    assert!(server.verifier.seen().is_empty());
}

#[tokio::test]
async fn slow_widget_times_out() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let config = config(&server.url).with_verification_timeout(Duration::from_millis(50));
    let mut session = PetitionSession::new(config, NullWidget::hanging()).unwrap();

    let outcome = session.verify(std::future::pending()).await.unwrap();
    assert_eq!(outcome, VerificationOutcome::TimedOut);
    assert_eq!(session.view().state, ViewState::Idle);
    assert_eq!(
        session.view().notice.as_deref(),
        Some("Verification timed out")
    );

    // The flow is usable again afterwards.
    assert!(session.verify(async {}).await.is_ok());
}

#[tokio::test]
async fn cancel_abandons_verification() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let widget = NullWidget::completing(NullWidget::sample_proof(2)).after(Duration::from_secs(5));
    let mut session = PetitionSession::new(config(&server.url), widget).unwrap();

    let outcome = session
        .verify(tokio::time::sleep(Duration::from_millis(20)))
        .await
        .unwrap();
    assert_eq!(outcome, VerificationOutcome::Cancelled);
    assert_eq!(session.view().state, ViewState::Idle);
    assert!(server.verifier.seen().is_empty());
}

#[tokio::test]
async fn blank_fields_are_not_sent() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let mut session = PetitionSession::new(
        config(&server.url),
        NullWidget::completing(NullWidget::sample_proof(3)),
    )
    .unwrap();
    session.verify(std::future::pending()).await.unwrap();

    session.set_title("   ");
    session.set_description("something");
    let err = session.submit().await.unwrap_err();
    assert!(matches!(err, ClientError::EmptyField));
    assert_eq!(session.view().state, ViewState::FormVisible);
    assert_eq!(
        session.view().notice.as_deref(),
        Some("Error: title and description are required")
    );
    let text = view::render(session.view());
    assert!(text.contains("> Error: title and description are required"));
    assert_eq!(server.store.count().unwrap(), 0);
}

#[tokio::test]
async fn cancelled_form_keeps_inputs() {
    let server = spawn_server(NullVerifier::accepting()).await;
    let mut session = PetitionSession::new(
        config(&server.url),
        NullWidget::completing(NullWidget::sample_proof(4)),
    )
    .unwrap();
    session.verify(std::future::pending()).await.unwrap();
    session.set_title("draft");

    session.cancel_form().unwrap();
    assert_eq!(session.view().state, ViewState::Idle);
    assert_eq!(session.view().title, "draft");
}

#[tokio::test]
async fn unreachable_server_is_a_visible_load_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let mut session = PetitionSession::new(
        config(&format!("http://{addr}")),
        NullWidget::dismissing(),
    )
    .unwrap();
    let err = session.refresh().await.unwrap_err();
    assert!(matches!(err, ClientError::Transport(_)));
    assert!(!session.view().loading);
    assert!(session.view().load_error.is_some());
    assert!(view::render(session.view()).contains("Could not load petitions"));
}
