//! HTTP request handlers.

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use petition_store::PetitionStore;
use petition_types::{NewPetition, Petition, PetitionId};
use petition_verification::{
    IdentityVerifier, VerificationError, VerificationProof, VerifyResponse,
};

use crate::metrics::{OUTCOME_ERROR, OUTCOME_REJECTED, OUTCOME_VERIFIED};
use crate::{ApiError, AppState};

// ── Petitions ────────────────────────────────────────────────────────────

/// `GET /api/petitions`
pub async fn list_petitions<S, V>(
    State(state): State<AppState<S, V>>,
) -> Result<Json<Vec<Petition>>, ApiError>
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let petitions = state.store.list()?;
    tracing::debug!(count = petitions.len(), "listed petitions");
    Ok(Json(petitions))
}

/// `POST /api/petitions`
///
/// The body is parsed by hand so that a body missing a field still reaches
/// validation and gets the contract's 400 message.
pub async fn create_petition<S, V>(
    State(state): State<AppState<S, V>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Petition>), ApiError>
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let input: NewPetition =
        serde_json::from_slice(&body).map_err(|e| ApiError::InvalidBody(e.to_string()))?;

    let valid = input.validate().inspect_err(|_| {
        state.metrics.petitions_rejected.inc();
    })?;

    let created = state.store.append(valid)?;
    state.metrics.petitions_created.inc();
    if let Ok(count) = state.store.count() {
        state.metrics.set_stored(count);
    }

    tracing::info!(id = %created.id, title = %created.title, "petition created");
    Ok((StatusCode::CREATED, Json(created)))
}

/// `GET /api/petitions/:id`
pub async fn get_petition<S, V>(
    State(state): State<AppState<S, V>>,
    Path(raw_id): Path<String>,
) -> Result<Json<Petition>, ApiError>
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let id: PetitionId = raw_id
        .parse()
        .map_err(|_| ApiError::NotFound(raw_id.clone()))?;
    Ok(Json(state.store.get(id)?))
}

// ── Verification ─────────────────────────────────────────────────────────

/// `POST /api/verify`
///
/// Answers with the `{success, detail?}` contract in every case, so the
/// client never has to parse two error shapes from this endpoint.
pub async fn verify_proof<S, V>(State(state): State<AppState<S, V>>, body: Bytes) -> Response
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let proof: VerificationProof = match serde_json::from_slice(&body) {
        Ok(proof) => proof,
        Err(e) => {
            tracing::warn!("malformed proof payload: {e}");
            state.metrics.record_verification(OUTCOME_REJECTED);
            return (
                StatusCode::BAD_REQUEST,
                Json(VerifyResponse::failed(format!("invalid proof: {e}"))),
            )
                .into_response();
        }
    };

    if let Err(e) = proof.check_format() {
        tracing::warn!("rejecting malformed proof: {e}");
        state.metrics.record_verification(OUTCOME_REJECTED);
        return (
            StatusCode::BAD_REQUEST,
            Json(VerifyResponse::failed(e.to_string())),
        )
            .into_response();
    }

    let Some(verifier) = state.verifier.as_ref() else {
        tracing::warn!("verification requested but no identity provider is configured");
        state.metrics.record_verification(OUTCOME_ERROR);
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(VerifyResponse::failed("verification is not configured")),
        )
            .into_response();
    };

    tracing::debug!(
        verifier = verifier.name(),
        nullifier_hash = %proof.nullifier_hash,
        "checking proof with identity provider"
    );

    match verifier.verify(&proof).await {
        Ok(()) => {
            state.metrics.record_verification(OUTCOME_VERIFIED);
            (StatusCode::OK, Json(VerifyResponse::verified())).into_response()
        }
        Err(e) => {
            let status = verification_status(&e);
            let outcome = if e.is_rejection() {
                OUTCOME_REJECTED
            } else {
                OUTCOME_ERROR
            };
            state.metrics.record_verification(outcome);
            let detail = match e {
                VerificationError::Rejected { detail, .. } => detail,
                other => other.to_string(),
            };
            (status, Json(VerifyResponse::failed(detail))).into_response()
        }
    }
}

fn verification_status(e: &VerificationError) -> StatusCode {
    match e {
        VerificationError::Rejected { .. } | VerificationError::InvalidProof(_) => {
            StatusCode::BAD_REQUEST
        }
        VerificationError::NotConfigured(_) => StatusCode::SERVICE_UNAVAILABLE,
        VerificationError::Unreachable(_)
        | VerificationError::Timeout
        | VerificationError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
    }
}

// ── Health & metrics ─────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub petitions: u64,
}

/// `GET /health`
pub async fn health<S, V>(
    State(state): State<AppState<S, V>>,
) -> Result<Json<HealthResponse>, ApiError>
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    let petitions = state.store.count()?;
    Ok(Json(HealthResponse {
        status: "ok",
        petitions,
    }))
}

/// `GET /metrics`
pub async fn metrics<S, V>(State(state): State<AppState<S, V>>) -> Response
where
    S: PetitionStore + 'static,
    V: IdentityVerifier,
{
    if let Ok(count) = state.store.count() {
        state.metrics.set_stored(count);
    }
    match state.metrics.encode() {
        Ok(text) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            text,
        )
            .into_response(),
        Err(e) => {
            tracing::error!("failed to encode metrics: {e}");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
