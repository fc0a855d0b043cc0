mod json_file;
mod postgres;

pub use json_file::JsonFileStore;
pub use postgres::PgStore;

use crate::config::{StorageBackend, StorageSettings};
use crate::domain::activity::ActivityEntry;
use crate::domain::record_set::RecordSet;
use sqlx::PgPool;

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("Failed to access the customer records file.")]
    Io(#[from] std::io::Error),
    #[error("Failed to serialize or deserialize the customer records.")]
    Serialization(#[from] serde_json::Error),
    #[error("Failed to execute a query against the database.")]
    Database(#[from] sqlx::Error),
    #[error("A stored customer record is corrupted: {0}")]
    Corrupted(String),
}

/// Durable home of the customer record set and of the activity log. Record
/// operations work on the whole set; the log is only ever appended to.
pub enum RecordStore {
    JsonFile(JsonFileStore),
    Postgres(PgStore),
}

impl RecordStore {
    pub fn build(settings: &StorageSettings, db_pool: PgPool) -> RecordStore {
        match settings.backend {
            StorageBackend::Json => RecordStore::JsonFile(JsonFileStore::new(settings.json_path.clone())),
            StorageBackend::Postgres => RecordStore::Postgres(PgStore::new(db_pool)),
        }
    }

    pub async fn load_all(&self) -> Result<RecordSet, StoreError> {
        match self {
            RecordStore::JsonFile(store) => store.load_all().await,
            RecordStore::Postgres(store) => store.load_all().await,
        }
    }

    pub async fn save_all(&self, records: &RecordSet) -> Result<(), StoreError> {
        match self {
            RecordStore::JsonFile(store) => store.save_all(records).await,
            RecordStore::Postgres(store) => store.save_all(records).await,
        }
    }

    pub async fn load_activity(&self) -> Result<Vec<ActivityEntry>, StoreError> {
        match self {
            RecordStore::JsonFile(store) => store.load_activity().await,
            RecordStore::Postgres(store) => store.load_activity().await,
        }
    }

    pub async fn append_activity(&self, entries: &[ActivityEntry]) -> Result<(), StoreError> {
        match self {
            RecordStore::JsonFile(store) => store.append_activity(entries).await,
            RecordStore::Postgres(store) => store.append_activity(entries).await,
        }
    }
}
