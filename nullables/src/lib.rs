//! Nullable infrastructure for deterministic testing.
//!
//! The identity provider is abstracted behind the `IdentityWidget` and
//! `IdentityVerifier` traits. This crate provides test-friendly
//! implementations that:
//! - Return scripted outcomes
//! - Record what they were asked
//! - Never touch the network
//!
//! Usage: swap the cloud verifier and the real widget for nullables in tests.

pub mod verifier;
pub mod widget;

pub use verifier::NullVerifier;
pub use widget::NullWidget;
