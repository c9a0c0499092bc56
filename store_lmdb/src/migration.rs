//! Schema version tracking.
//!
//! The meta database stores a schema version. A fresh database is stamped
//! with [`CURRENT_SCHEMA_VERSION`]; any other stored version is refused.

use heed::types::Bytes;
use heed::{Database, Env};

use crate::LmdbError;

/// The schema version that the current code expects.
pub const CURRENT_SCHEMA_VERSION: u32 = 1;

const SCHEMA_VERSION_KEY: &[u8] = b"schema_version";

/// Read the stored schema version. `0` means a fresh database.
pub fn stored_version(env: &Env, meta_db: &Database<Bytes, Bytes>) -> Result<u32, LmdbError> {
    let rtxn = env.read_txn()?;
    match meta_db.get(&rtxn, SCHEMA_VERSION_KEY)? {
        Some(bytes) => {
            let arr: [u8; 4] = bytes.try_into().map_err(|_| {
                LmdbError::Serialization("schema_version has unexpected byte length".to_string())
            })?;
            Ok(u32::from_le_bytes(arr))
        }
        None => Ok(0),
    }
}

/// Stamp a fresh database, or verify that an existing one matches.
pub fn ensure_schema(env: &Env, meta_db: &Database<Bytes, Bytes>) -> Result<(), LmdbError> {
    let found = stored_version(env, meta_db)?;

    if found == CURRENT_SCHEMA_VERSION {
        tracing::debug!(version = found, "database schema is up to date");
        return Ok(());
    }

    if found != 0 {
        return Err(LmdbError::SchemaMismatch {
            found,
            expected: CURRENT_SCHEMA_VERSION,
        });
    }

    let mut wtxn = env.write_txn()?;
    meta_db.put(
        &mut wtxn,
        SCHEMA_VERSION_KEY,
        &CURRENT_SCHEMA_VERSION.to_le_bytes(),
    )?;
    wtxn.commit()?;
    tracing::info!(version = CURRENT_SCHEMA_VERSION, "initialized database schema");
    Ok(())
}
