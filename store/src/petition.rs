//! Petition storage trait.

use crate::StoreError;
use petition_types::{Petition, PetitionId, ValidPetition};
use std::sync::Arc;

/// Ordered, append-only collection of petitions.
///
/// Implementations serialize appends: concurrent callers never lose a
/// record and every stored petition gets a distinct id. Ids grow with
/// insertion order, so `list` returns petitions sorted by id.
pub trait PetitionStore: Send + Sync {
    /// Every stored petition in insertion order.
    fn list(&self) -> Result<Vec<Petition>, StoreError>;

    /// Assign the next id, store the petition with zero signatures, and
    /// return the stored record.
    fn append(&self, petition: ValidPetition) -> Result<Petition, StoreError>;

    /// Look up a single petition.
    fn get(&self, id: PetitionId) -> Result<Petition, StoreError>;

    /// Number of stored petitions.
    fn count(&self) -> Result<u64, StoreError> {
        self.list().map(|v| v.len() as u64)
    }
}

impl<S: PetitionStore + ?Sized> PetitionStore for Arc<S> {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        (**self).list()
    }

    fn append(&self, petition: ValidPetition) -> Result<Petition, StoreError> {
        (**self).append(petition)
    }

    fn get(&self, id: PetitionId) -> Result<Petition, StoreError> {
        (**self).get(id)
    }

    fn count(&self) -> Result<u64, StoreError> {
        (**self).count()
    }
}

impl<S: PetitionStore + ?Sized> PetitionStore for Box<S> {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        (**self).list()
    }

    fn append(&self, petition: ValidPetition) -> Result<Petition, StoreError> {
        (**self).append(petition)
    }

    fn get(&self, id: PetitionId) -> Result<Petition, StoreError> {
        (**self).get(id)
    }

    fn count(&self) -> Result<u64, StoreError> {
        (**self).count()
    }
}
