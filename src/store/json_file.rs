use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use uuid::Uuid;

use super::StoreError;
use crate::domain::activity::ActivityEntry;
use crate::domain::customer::CustomerRecord;
use crate::domain::record_set::RecordSet;

/// Stores the record set as a JSON array in a single file. The activity log
/// lives in a sibling `<name>_activity.json` file.
pub struct JsonFileStore {
    path: PathBuf,
    activity_path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: PathBuf) -> JsonFileStore {
        let stem = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_else(|| String::from("customers"));
        let activity_path = path.with_file_name(format!("{}_activity.json", stem));

        JsonFileStore { path, activity_path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn activity_path(&self) -> &Path {
        &self.activity_path
    }

    #[tracing::instrument(name = "Loading customer records from file", skip(self), fields(path = %self.path.display()))]
    pub async fn load_all(&self) -> Result<RecordSet, StoreError> {
        let records: Vec<CustomerRecord> = read_json_array(&self.path).await?;

        RecordSet::try_from(records).map_err(StoreError::Corrupted)
    }

    #[tracing::instrument(
        name = "Saving customer records to file",
        skip(self, records),
        fields(path = %self.path.display(), records = records.len())
    )]
    pub async fn save_all(&self, records: &RecordSet) -> Result<(), StoreError> {
        write_atomically(&self.path, &serde_json::to_vec_pretty(records)?).await
    }

    #[tracing::instrument(name = "Loading the activity log from file", skip(self), fields(path = %self.activity_path.display()))]
    pub async fn load_activity(&self) -> Result<Vec<ActivityEntry>, StoreError> {
        read_json_array(&self.activity_path).await
    }

    #[tracing::instrument(
        name = "Appending to the activity log file",
        skip(self, entries),
        fields(path = %self.activity_path.display(), entries = entries.len())
    )]
    pub async fn append_activity(&self, entries: &[ActivityEntry]) -> Result<(), StoreError> {
        if entries.is_empty() {
            return Ok(());
        }

        let mut log = self.load_activity().await?;

        log.extend_from_slice(entries);

        write_atomically(&self.activity_path, &serde_json::to_vec_pretty(&log)?).await
    }
}

/// Reads a JSON array, treating a missing or blank file as empty
async fn read_json_array<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let content = match tokio::fs::read(path).await {
        Ok(content) => content,
        // Nothing was saved yet
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err.into()),
    };

    if content.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }

    Ok(serde_json::from_slice(&content)?)
}

/// Writes a sibling temporary file and renames it over the target, so an
/// interrupted save leaves the previous content in place.
async fn write_atomically(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }

    let temporary_path = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));

    if let Err(err) = tokio::fs::write(&temporary_path, content).await {
        let _ = tokio::fs::remove_file(&temporary_path).await;
        return Err(err.into());
    }

    tokio::fs::rename(&temporary_path, path).await?;

    Ok(())
}
