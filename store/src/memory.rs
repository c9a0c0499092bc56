//! In-memory petition store.
//!
//! The default backend. Contents live only as long as the process.

use crate::{PetitionStore, StoreError};
use petition_types::{Petition, PetitionId, ValidPetition};
use std::sync::{Mutex, MutexGuard};

/// Thread-safe in-memory store. Appends take the mutex, so ids are
/// allocated without gaps or duplicates.
#[derive(Debug, Default)]
pub struct MemoryPetitionStore {
    petitions: Mutex<Vec<Petition>>,
}

impl MemoryPetitionStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<Petition>>, StoreError> {
        self.petitions
            .lock()
            .map_err(|_| StoreError::Backend("petition list mutex poisoned".to_string()))
    }
}

impl PetitionStore for MemoryPetitionStore {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        Ok(self.lock()?.clone())
    }

    fn append(&self, petition: ValidPetition) -> Result<Petition, StoreError> {
        let mut petitions = self.lock()?;
        let id = petitions
            .last()
            .map(|p| p.id.next())
            .unwrap_or(PetitionId::FIRST);
        let stored = petition.into_petition(id);
        petitions.push(stored.clone());
        tracing::debug!(id = %stored.id, "petition appended to memory store");
        Ok(stored)
    }

    fn get(&self, id: PetitionId) -> Result<Petition, StoreError> {
        self.lock()?
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(id.to_string()))
    }

    fn count(&self) -> Result<u64, StoreError> {
        Ok(self.lock()?.len() as u64)
    }
}
