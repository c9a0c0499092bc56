//! HTTP client for the petitions API.

use serde::Deserialize;
use std::time::Duration;

use petition_types::{NewPetition, Petition};
use petition_verification::{VerificationProof, VerifyResponse};

use crate::ClientError;

/// Default timeout for API requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connection timeout.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the petitions HTTP API.
#[derive(Clone)]
pub struct PetitionApi {
    /// HTTP client (reusable connection pool).
    http_client: reqwest::Client,
    base_url: String,
}

/// `{"error": "..."}` body returned by the petition endpoints.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
}

fn transport(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Transport(format!("request timed out: {e}"))
    } else if e.is_connect() {
        ClientError::Transport(format!("connection failed: {e}"))
    } else {
        ClientError::Transport(e.to_string())
    }
}

impl PetitionApi {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        let http_client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .connect_timeout(DEFAULT_CONNECT_TIMEOUT)
            .build()
            .map_err(transport)?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/petitions`
    pub async fn list(&self) -> Result<Vec<Petition>, ClientError> {
        let response = self
            .http_client
            .get(self.url("/api/petitions"))
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response.json().await.map_err(|e| {
            ClientError::InvalidResponse(format!("failed to parse petition list: {e}"))
        })
    }

    /// `POST /api/petitions`
    pub async fn create(&self, petition: &NewPetition) -> Result<Petition, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/petitions"))
            .json(petition)
            .send()
            .await
            .map_err(transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }

        response.json().await.map_err(|e| {
            ClientError::InvalidResponse(format!("failed to parse created petition: {e}"))
        })
    }

    /// `POST /api/verify`
    ///
    /// The endpoint answers `{success, detail?}` on every status, so the
    /// body is parsed regardless of the status code.
    pub async fn verify(&self, proof: &VerificationProof) -> Result<VerifyResponse, ClientError> {
        let response = self
            .http_client
            .post(self.url("/api/verify"))
            .json(proof)
            .send()
            .await
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().await.map_err(transport)?;
        serde_json::from_str(&text).map_err(|_| {
            ClientError::InvalidResponse(format!("unexpected verify response (HTTP {status})"))
        })
    }
}

async fn rejection(response: reqwest::Response) -> ClientError {
    let status = response.status();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => format!("HTTP status {status}"),
    };
    ClientError::Rejected {
        status: status.as_u16(),
        message,
    }
}
