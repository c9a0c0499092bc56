//! Nullable verifier: scripted provider decisions.

use petition_verification::{IdentityVerifier, VerificationError, VerificationProof};
use std::collections::VecDeque;
use std::sync::Mutex;

/// A verifier that replays queued outcomes in order, then falls back to a
/// default (accept, unless built with [`NullVerifier::rejecting`]).
pub struct NullVerifier {
    queued: Mutex<VecDeque<Result<(), VerificationError>>>,
    reject_by_default: Option<String>,
    seen: Mutex<Vec<VerificationProof>>,
}

impl NullVerifier {
    /// Accept every proof.
    pub fn accepting() -> Self {
        Self {
            queued: Mutex::new(VecDeque::new()),
            reject_by_default: None,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Reject every proof with the given detail.
    pub fn rejecting(detail: impl Into<String>) -> Self {
        Self {
            reject_by_default: Some(detail.into()),
            ..Self::accepting()
        }
    }

    /// Queue a one-off outcome for the next call.
    pub fn push_outcome(&self, outcome: Result<(), VerificationError>) {
        self.queued.lock().unwrap().push_back(outcome);
    }

    /// Every proof passed to `verify`, in call order.
    pub fn seen(&self) -> Vec<VerificationProof> {
        self.seen.lock().unwrap().clone()
    }
}

impl Default for NullVerifier {
    fn default() -> Self {
        Self::accepting()
    }
}

impl IdentityVerifier for NullVerifier {
    fn name(&self) -> &str {
        "null-verifier"
    }

    async fn verify(&self, proof: &VerificationProof) -> Result<(), VerificationError> {
        self.seen.lock().unwrap().push(proof.clone());
        if let Some(outcome) = self.queued.lock().unwrap().pop_front() {
            return outcome;
        }
        match &self.reject_by_default {
            Some(detail) => Err(VerificationError::Rejected {
                code: None,
                detail: detail.clone(),
            }),
            None => Ok(()),
        }
    }
}
