//! A widget stand-in for headless use: the proof comes from a JSON file
//! written by the real verification widget.

use std::path::PathBuf;

use petition_verification::{AppId, IdentityWidget, VerificationError, VerificationProof};

pub struct ProofFileWidget {
    path: PathBuf,
}

impl ProofFileWidget {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl IdentityWidget for ProofFileWidget {
    /// An empty file counts as a closed widget.
    async fn request_proof(
        &self,
        app_id: &AppId,
        action: &str,
    ) -> Result<Option<VerificationProof>, VerificationError> {
        tracing::debug!(path = %self.path.display(), %app_id, action, "reading proof file");

        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            VerificationError::InvalidProof(format!(
                "cannot read proof file {}: {e}",
                self.path.display()
            ))
        })?;
        if contents.trim().is_empty() {
            return Ok(None);
        }

        let proof: VerificationProof = serde_json::from_str(&contents)
            .map_err(|e| VerificationError::InvalidProof(format!("malformed proof file: {e}")))?;
        proof.check_format()?;
        Ok(Some(proof))
    }
}
