//! LMDB storage backend for petitions.
//!
//! Implements [`petition_store::PetitionStore`] with the `heed` LMDB
//! bindings. Petitions survive restarts, and LMDB's single-writer
//! transactions make id allocation and append atomic.

pub mod environment;
pub mod error;
pub mod migration;
pub mod petition;

pub use environment::LmdbEnvironment;
pub use error::LmdbError;
pub use petition::LmdbPetitionStore;
