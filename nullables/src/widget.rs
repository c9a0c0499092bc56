//! Nullable widget: a person who behaves exactly as scripted.

use petition_verification::{AppId, IdentityWidget, VerificationError, VerificationLevel, VerificationProof};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

enum Behavior {
    Complete(VerificationProof),
    Dismiss,
    Hang,
    Fail(String),
}

/// A widget that completes, dismisses, hangs, or fails on every call.
pub struct NullWidget {
    behavior: Behavior,
    delay: Duration,
    calls: AtomicUsize,
}

impl NullWidget {
    /// Complete the challenge with the given proof.
    pub fn completing(proof: VerificationProof) -> Self {
        Self::with(Behavior::Complete(proof))
    }

    /// Close the widget without a result.
    pub fn dismissing() -> Self {
        Self::with(Behavior::Dismiss)
    }

    /// Never finish. Useful for timeout and cancellation tests.
    pub fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    /// Fail inside the widget itself.
    pub fn failing(message: impl Into<String>) -> Self {
        Self::with(Behavior::Fail(message.into()))
    }

    /// Wait this long before answering.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Number of times the widget was opened.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// A syntactically valid proof with the given nullifier hash suffix.
    pub fn sample_proof(nullifier_suffix: u8) -> VerificationProof {
        VerificationProof {
            merkle_root: "0x1f38b57f3bdf96f05ea62fa68814871bf0ca8ce4dbe073d8497d5a6b0a53e5e0"
                .to_string(),
            nullifier_hash: format!(
                "0x2bf8406809dcefb1486dadc96c0a897db9bab002053054cf64272db512c6fb{nullifier_suffix:02x}"
            ),
            proof: "0x1aa8b8f3b2d2de5ff452c0e1a83e29d6bf46fb83ef35dc5957121ff3d3698a11"
                .to_string(),
            verification_level: VerificationLevel::Orb,
            signal_hash: None,
        }
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            behavior,
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }
}

impl IdentityWidget for NullWidget {
    async fn request_proof(
        &self,
        _app_id: &AppId,
        _action: &str,
    ) -> Result<Option<VerificationProof>, VerificationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        match &self.behavior {
            Behavior::Complete(proof) => Ok(Some(proof.clone())),
            Behavior::Dismiss => Ok(None),
            Behavior::Hang => std::future::pending().await,
            Behavior::Fail(message) => Err(VerificationError::Unreachable(message.clone())),
        }
    }
}
