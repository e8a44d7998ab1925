use thiserror::Error;

pub type Hash = [u8; 32];
pub const HASH_SIZE: usize = 32;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("migration failed: {0}")]
    Migration(String),

    #[error("database schema version {found} is newer than supported version {supported}")]
    FutureSchema { found: u32, supported: u32 },

    #[error("policy '{0}' not found")]
    PolicyNotFound(String),

    #[error("ioc '{0}' not found")]
    IocNotFound(String),
}

pub type Result<T> = std::result::Result<T, RegistryError>;
