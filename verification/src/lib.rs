//! Proof-of-personhood verification.
//!
//! The identity provider is an external capability: a widget on the client
//! yields a [`VerificationProof`], and a cloud endpoint decides whether the
//! proof is valid for a given application and action. This crate holds the
//! proof types, the [`IdentityWidget`] and [`IdentityVerifier`] seams, and
//! [`CloudVerifier`], the HTTP implementation of the verifier seam.
//!
//! The nullifier hash inside a proof identifies a person per action without
//! revealing who they are. Nothing here uses it for deduplication.

pub mod app;
pub mod cloud;
pub mod error;
pub mod method;
pub mod proof;
pub mod widget;

pub use app::{AppId, AppIdError};
pub use cloud::{CloudVerifier, DEFAULT_VERIFY_BASE_URL};
pub use error::VerificationError;
pub use method::IdentityVerifier;
pub use proof::{VerificationLevel, VerificationProof, VerifyResponse};
pub use widget::IdentityWidget;
