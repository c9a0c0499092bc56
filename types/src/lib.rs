//! Fundamental types for the petitions service.
//!
//! This crate defines the types shared across every other crate in the
//! workspace: petition records, their identifiers, and the validation applied
//! to incoming petitions.

pub mod error;
pub mod id;
pub mod petition;

pub use error::ValidationError;
pub use id::PetitionId;
pub use petition::{NewPetition, Petition, ValidPetition};
