//! Storage abstraction for petitions.
//!
//! Every backend (in-memory, LMDB) implements [`PetitionStore`]. The HTTP
//! service and the daemon depend only on the trait.

pub mod error;
pub mod memory;
pub mod petition;

pub use error::StoreError;
pub use memory::MemoryPetitionStore;
pub use petition::PetitionStore;
