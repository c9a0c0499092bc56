use thiserror::Error;

#[derive(Debug, Error)]
pub enum LmdbError {
    #[error("LMDB error: {0}")]
    Heed(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("key not found: {0}")]
    NotFound(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("database schema version {found} is not supported (expected {expected})")]
    SchemaMismatch { found: u32, expected: u32 },
}

impl From<heed::Error> for LmdbError {
    fn from(e: heed::Error) -> Self {
        LmdbError::Heed(e.to_string())
    }
}

impl From<bincode::Error> for LmdbError {
    fn from(e: bincode::Error) -> Self {
        LmdbError::Serialization(e.to_string())
    }
}

impl From<LmdbError> for petition_store::StoreError {
    fn from(e: LmdbError) -> Self {
        match e {
            LmdbError::NotFound(key) => petition_store::StoreError::NotFound(key),
            LmdbError::Serialization(msg) => petition_store::StoreError::Serialization(msg),
            LmdbError::SchemaMismatch { .. } => {
                petition_store::StoreError::Corruption(e.to_string())
            }
            other => petition_store::StoreError::Backend(other.to_string()),
        }
    }
}
