//! Proof payloads and the verification result contract.

use serde::{Deserialize, Serialize};

use crate::VerificationError;

/// Credential the person verified with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationLevel {
    #[default]
    Orb,
    SecureDocument,
    Document,
    Device,
}

/// What the widget hands back after a successful challenge.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerificationProof {
    pub merkle_root: String,
    pub nullifier_hash: String,
    pub proof: String,
    #[serde(default)]
    pub verification_level: VerificationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signal_hash: Option<String>,
}

impl VerificationProof {
    /// Reject proofs whose fields are not `0x`-prefixed hex, before spending
    /// a round trip to the provider on them.
    pub fn check_format(&self) -> Result<(), VerificationError> {
        check_hex("merkle_root", &self.merkle_root)?;
        check_hex("nullifier_hash", &self.nullifier_hash)?;
        check_hex("proof", &self.proof)?;
        if let Some(signal_hash) = &self.signal_hash {
            check_hex("signal_hash", signal_hash)?;
        }
        Ok(())
    }
}

fn check_hex(field: &str, value: &str) -> Result<(), VerificationError> {
    let digits = value
        .strip_prefix("0x")
        .ok_or_else(|| VerificationError::InvalidProof(format!("{field} must start with 0x")))?;
    if digits.is_empty() {
        return Err(VerificationError::InvalidProof(format!("{field} is empty")));
    }
    // Providers emit unpadded hex for some fields.
    let padded;
    let even = if digits.len() % 2 == 1 {
        padded = format!("0{digits}");
        padded.as_str()
    } else {
        digits
    };
    hex::decode(even)
        .map(|_| ())
        .map_err(|e| VerificationError::InvalidProof(format!("{field}: {e}")))
}

/// Result contract between the Store Service and its clients:
/// `{success: boolean, detail?: string}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl VerifyResponse {
    pub fn verified() -> Self {
        Self {
            success: true,
            detail: None,
        }
    }

    pub fn failed(detail: impl Into<String>) -> Self {
        Self {
            success: false,
            detail: Some(detail.into()),
        }
    }
}
