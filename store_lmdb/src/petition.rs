//! LMDB implementation of PetitionStore.
//!
//! Keys are big-endian petition ids, so a cursor walk over the `petitions`
//! database yields insertion order. Values are bincode-encoded records.

use std::path::Path;
use std::sync::Arc;

use heed::types::Bytes;
use heed::{Database, Env};

use petition_store::{PetitionStore, StoreError};
use petition_types::{Petition, PetitionId, ValidPetition};

use crate::environment::{LmdbEnvironment, DEFAULT_MAP_SIZE};
use crate::migration;
use crate::LmdbError;

pub struct LmdbPetitionStore {
    pub(crate) env: Arc<Env>,
    pub(crate) petitions_db: Database<Bytes, Bytes>,
}

impl LmdbPetitionStore {
    /// Open the store in `path` with the default map size.
    pub fn open(path: &Path) -> Result<Self, LmdbError> {
        Self::open_with_map_size(path, DEFAULT_MAP_SIZE)
    }

    pub fn open_with_map_size(path: &Path, map_size: usize) -> Result<Self, LmdbError> {
        let lmdb = LmdbEnvironment::open(path, map_size)?;
        migration::ensure_schema(&lmdb.env, &lmdb.meta_db)?;
        Ok(Self::from_environment(lmdb))
    }

    pub fn from_environment(lmdb: LmdbEnvironment) -> Self {
        Self {
            env: lmdb.env,
            petitions_db: lmdb.petitions_db,
        }
    }
}

fn decode(key: &[u8], val: &[u8]) -> Result<Petition, LmdbError> {
    let petition: Petition = bincode::deserialize(val)?;
    if PetitionId::from_key(key) != Some(petition.id) {
        return Err(LmdbError::Serialization(format!(
            "petition {} stored under mismatched key",
            petition.id
        )));
    }
    Ok(petition)
}

impl PetitionStore for LmdbPetitionStore {
    fn list(&self) -> Result<Vec<Petition>, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let iter = self.petitions_db.iter(&rtxn).map_err(LmdbError::from)?;
        let mut petitions = Vec::new();
        for result in iter {
            let (key, val) = result.map_err(LmdbError::from)?;
            petitions.push(decode(key, val)?);
        }
        Ok(petitions)
    }

    fn append(&self, petition: ValidPetition) -> Result<Petition, StoreError> {
        // The write transaction holds LMDB's writer lock, so reading the
        // last id and inserting the next one cannot interleave with another
        // append.
        let mut wtxn = self.env.write_txn().map_err(LmdbError::from)?;
        let id = match self.petitions_db.last(&wtxn).map_err(LmdbError::from)? {
            Some((key, _)) => PetitionId::from_key(key)
                .ok_or_else(|| {
                    LmdbError::Serialization("petition key has unexpected length".to_string())
                })?
                .next(),
            None => PetitionId::FIRST,
        };

        let stored = petition.into_petition(id);
        let bytes = bincode::serialize(&stored).map_err(LmdbError::from)?;
        self.petitions_db
            .put(&mut wtxn, &id.to_key(), &bytes)
            .map_err(LmdbError::from)?;
        wtxn.commit().map_err(LmdbError::from)?;

        tracing::debug!(id = %id, "petition appended to LMDB store");
        Ok(stored)
    }

    fn get(&self, id: PetitionId) -> Result<Petition, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let val = self
            .petitions_db
            .get(&rtxn, &id.to_key())
            .map_err(LmdbError::from)?
            .ok_or_else(|| LmdbError::NotFound(id.to_string()))?;
        Ok(decode(&id.to_key(), val)?)
    }

    fn count(&self) -> Result<u64, StoreError> {
        let rtxn = self.env.read_txn().map_err(LmdbError::from)?;
        let count = self.petitions_db.len(&rtxn).map_err(LmdbError::from)?;
        Ok(count)
    }
}
