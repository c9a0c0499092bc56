//! The client-side half of the identity provider.

use std::future::Future;

use crate::{AppId, VerificationError, VerificationProof};

/// Presents the provider's challenge to the person and yields a proof.
///
/// `Ok(None)` means the widget was closed without completing the
/// challenge. How long this takes is up to the person and the provider;
/// callers bound it themselves.
pub trait IdentityWidget: Send + Sync {
    fn request_proof(
        &self,
        app_id: &AppId,
        action: &str,
    ) -> impl Future<Output = Result<Option<VerificationProof>, VerificationError>> + Send;
}
