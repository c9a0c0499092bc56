use std::time::Duration;

use petition_verification::{
    AppId, CloudVerifier, IdentityVerifier, VerificationError, VerificationLevel,
    VerificationProof,
};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn proof() -> VerificationProof {
    VerificationProof {
        merkle_root: "0x1f38b57f3bdf96f05ea62fa68814871bf0ca8ce4dbe073d8497d5a6b0a53e5e0".into(),
        nullifier_hash: "0x2bf8406809dcefb1486dadc96c0a897db9bab002053054cf64272db512c6fbd8"
            .into(),
        proof: "0x1aa8b8f3b2d2de5ff452c0e1a83e29d6bf46fb83ef35dc5957121ff3d3698a11".into(),
        verification_level: VerificationLevel::Orb,
        signal_hash: None,
    }
}

fn verifier(server: &MockServer) -> CloudVerifier {
    CloudVerifier::new(
        server.uri(),
        AppId::new("app_staging_test").unwrap(),
        "create-petition",
    )
    .unwrap()
}

#[tokio::test]
async fn accepted_proof_verifies() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v2/verify/app_staging_test"))
        .and(body_partial_json(serde_json::json!({
            "action": "create-petition",
            "verification_level": "orb",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "action": "create-petition",
        })))
        .expect(1)
        .mount(&server)
        .await;

    verifier(&server).verify(&proof()).await.unwrap();
}

#[tokio::test]
async fn rejection_carries_provider_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "code": "max_verifications_reached",
            "detail": "This person has already verified for this action.",
            "attribute": null,
        })))
        .mount(&server)
        .await;

    let err = verifier(&server).verify(&proof()).await.unwrap_err();
    match err {
        VerificationError::Rejected { code, detail } => {
            assert_eq!(code.as_deref(), Some("max_verifications_reached"));
            assert_eq!(detail, "This person has already verified for this action.");
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn provider_outage_is_not_a_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = verifier(&server).verify(&proof()).await.unwrap_err();
    assert!(matches!(err, VerificationError::Unreachable(_)));
    assert!(!err.is_rejection());
}

#[tokio::test]
async fn malformed_proof_never_reaches_provider() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut bad = proof();
    bad.proof = "not-hex".into();
    let err = verifier(&server).verify(&bad).await.unwrap_err();
    assert!(matches!(err, VerificationError::InvalidProof(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(2)))
        .mount(&server)
        .await;

    let verifier = CloudVerifier::with_timeout(
        server.uri(),
        AppId::new("app_staging_test").unwrap(),
        "create-petition",
        Duration::from_millis(100),
    )
    .unwrap();
    let err = verifier.verify(&proof()).await.unwrap_err();
    assert!(matches!(err, VerificationError::Timeout));
}

#[test]
fn empty_action_is_a_configuration_error() {
    let result = CloudVerifier::new(
        "http://localhost",
        AppId::new("app_staging_test").unwrap(),
        "",
    );
    assert!(matches!(result, Err(VerificationError::NotConfigured(_))));
}
