//! The verification seam.

use std::future::Future;

use crate::{VerificationError, VerificationProof};

/// Checks a widget proof with the identity provider.
///
/// The HTTP service depends on this trait only; production wires in
/// [`crate::CloudVerifier`], tests use a scripted double.
pub trait IdentityVerifier: Send + Sync + 'static {
    /// Human-readable name of this verifier, for logs.
    fn name(&self) -> &str;

    /// `Ok(())` when the provider accepted the proof.
    fn verify(
        &self,
        proof: &VerificationProof,
    ) -> impl Future<Output = Result<(), VerificationError>> + Send;
}
