use thiserror::Error;

#[derive(Debug, Error)]
pub enum VerificationError {
    /// The provider looked at the proof and said no.
    #[error("verification rejected: {detail}")]
    Rejected { code: Option<String>, detail: String },

    /// The proof is malformed and was not sent to the provider.
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("verification provider unreachable: {0}")]
    Unreachable(String),

    #[error("verification timed out")]
    Timeout,

    #[error("invalid response from verification provider: {0}")]
    InvalidResponse(String),

    #[error("verification is not configured: {0}")]
    NotConfigured(String),
}

impl VerificationError {
    /// Whether the proof itself was at fault, as opposed to the provider or
    /// the network.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. } | Self::InvalidProof(_))
    }
}
