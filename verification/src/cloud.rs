//! HTTP client for the identity provider's cloud verification endpoint.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::{AppId, IdentityVerifier, VerificationError, VerificationLevel, VerificationProof};

/// Production base URL of the cloud verification API.
pub const DEFAULT_VERIFY_BASE_URL: &str = "https://developer.worldcoin.org";

/// Default timeout for verification requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the cloud verification API.
///
/// Sends `POST {base_url}/api/v2/verify/{app_id}` with the proof and the
/// action. HTTP 200 means the proof is valid; any other status carries a
/// `{code, detail, attribute}` body.
pub struct CloudVerifier {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
    app_id: AppId,
    action: String,
}

/// Request body expected by the provider.
#[derive(Debug, Serialize)]
struct VerifyRequest<'a> {
    nullifier_hash: &'a str,
    merkle_root: &'a str,
    proof: &'a str,
    verification_level: VerificationLevel,
    action: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    signal_hash: Option<&'a str>,
}

/// Error body returned by the provider on non-200 responses.
#[derive(Debug, Deserialize)]
struct ProviderError {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl CloudVerifier {
    /// Create a verifier with default timeout settings.
    pub fn new(
        base_url: impl Into<String>,
        app_id: AppId,
        action: impl Into<String>,
    ) -> Result<Self, VerificationError> {
        Self::with_timeout(base_url, app_id, action, DEFAULT_TIMEOUT)
    }

    /// Create a verifier with a custom request timeout.
    pub fn with_timeout(
        base_url: impl Into<String>,
        app_id: AppId,
        action: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, VerificationError> {
        let action = action.into();
        if action.is_empty() {
            return Err(VerificationError::NotConfigured(
                "action is empty".to_string(),
            ));
        }
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT.min(timeout))
            .build()
            .map_err(|e| VerificationError::NotConfigured(format!("http client: {e}")))?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            app_id,
            action,
        })
    }

    pub fn app_id(&self) -> &AppId {
        &self.app_id
    }

    pub fn action(&self) -> &str {
        &self.action
    }

    fn endpoint(&self) -> String {
        format!("{}/api/v2/verify/{}", self.base_url, self.app_id)
    }

    async fn send(&self, proof: &VerificationProof) -> Result<(), VerificationError> {
        proof.check_format()?;

        let body = VerifyRequest {
            nullifier_hash: &proof.nullifier_hash,
            merkle_root: &proof.merkle_root,
            proof: &proof.proof,
            verification_level: proof.verification_level,
            action: &self.action,
            signal_hash: proof.signal_hash.as_deref(),
        };

        let response = self
            .http_client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VerificationError::Timeout
                } else if e.is_connect() {
                    VerificationError::Unreachable(format!("connection failed: {e}"))
                } else {
                    VerificationError::Unreachable(e.to_string())
                }
            })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let text = response.text().await.map_err(|e| {
            VerificationError::InvalidResponse(format!("failed to read error body: {e}"))
        })?;

        if status.is_server_error() {
            return Err(VerificationError::Unreachable(format!(
                "HTTP status {status}"
            )));
        }

        match serde_json::from_str::<ProviderError>(&text) {
            Ok(err) => Err(VerificationError::Rejected {
                detail: err
                    .detail
                    .unwrap_or_else(|| format!("HTTP status {status}")),
                code: err.code,
            }),
            Err(_) => Err(VerificationError::Rejected {
                code: None,
                detail: format!("HTTP status {status}"),
            }),
        }
    }
}

impl IdentityVerifier for CloudVerifier {
    fn name(&self) -> &str {
        "cloud"
    }

    async fn verify(&self, proof: &VerificationProof) -> Result<(), VerificationError> {
        let result = self.send(proof).await;
        match &result {
            Ok(()) => tracing::info!(
                app_id = %self.app_id,
                action = %self.action,
                nullifier_hash = %proof.nullifier_hash,
                "proof verified by provider"
            ),
            Err(e) => tracing::warn!(app_id = %self.app_id, "proof verification failed: {e}"),
        }
        result
    }
}
