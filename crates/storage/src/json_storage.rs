//! JSON file storage implementation.
//!
//! Stores every record as a JSON envelope file under `<root>/<kind>/`. File
//! names are the hex-encoded record key, so user-chosen names never reach
//! the file system verbatim. Writes go to a temporary file that is renamed
//! into place, so a failed write leaves the previous state untouched.

use std::path::{Path, PathBuf};
use async_trait::async_trait;
use fittrack_core::{Exercise, ExerciseFilter, Goal, Routine, RoutineEntry};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::fs;
use tracing::{debug, warn};
use crate::record::{encode_key, Envelope, RecordKind};
use super::{Storage, StorageError, Result};

const KINDS: [RecordKind; 3] = [RecordKind::Exercise, RecordKind::Routine, RecordKind::Goal];

/// File-based JSON storage backend.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage, creating one directory per record kind under `root`.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        for kind in KINDS {
            fs::create_dir_all(kind_dir(&root, kind)).await?;
        }
        debug!("Opened JSON storage at {}", root.display());
        Ok(Self { root })
    }

    /// Root directory of this store.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, kind: RecordKind, key: &str) -> PathBuf {
        kind_dir(&self.root, kind).join(format!("{}.json", encode_key(key)))
    }

    async fn insert<T: Serialize + Sync>(
        &self,
        kind: RecordKind,
        key: &str,
        data: &T,
    ) -> Result<()> {
        let path = self.record_path(kind, key);
        if fs::try_exists(&path).await? {
            return Err(StorageError::duplicate(kind, key));
        }
        let now = chrono::Utc::now();
        let envelope = Envelope {
            kind,
            key: key.to_string(),
            data,
            created_at: now,
            updated_at: now,
        };
        write_atomic(&path, &envelope).await
    }

    async fn replace<T: Serialize + DeserializeOwned + Sync>(
        &self,
        kind: RecordKind,
        key: &str,
        data: &T,
    ) -> Result<()> {
        let path = self.record_path(kind, key);
        let Some(existing) = read_keyed::<T>(&path, key).await? else {
            return Err(StorageError::not_found(kind, key));
        };
        let envelope = Envelope {
            kind,
            key: key.to_string(),
            data,
            created_at: existing.created_at,
            updated_at: chrono::Utc::now(),
        };
        write_atomic(&path, &envelope).await
    }

    async fn get<T: DeserializeOwned>(&self, kind: RecordKind, key: &str) -> Result<Option<T>> {
        Ok(read_keyed(&self.record_path(kind, key), key).await?.map(|e| e.data))
    }

    async fn list<T: DeserializeOwned>(&self, kind: RecordKind) -> Result<Vec<T>> {
        let mut envelopes: Vec<Envelope<T>> = Vec::new();
        let mut rd = fs::read_dir(kind_dir(&self.root, kind)).await?;
        while let Some(entry) = rd.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            match read_envelope(&path).await {
                Ok(Some(envelope)) => envelopes.push(envelope),
                Ok(None) => {}
                Err(e) => warn!("Skipping unreadable {} record {}: {}", kind, path.display(), e),
            }
        }
        envelopes.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(envelopes.into_iter().map(|e| e.data).collect())
    }

    async fn remove(&self, kind: RecordKind, key: &str) -> Result<()> {
        match fs::remove_file(self.record_path(kind, key)).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::not_found(kind, key))
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl Storage for JsonStorage {
    async fn create_exercise(&self, exercise: &Exercise) -> Result<()> {
        self.insert(RecordKind::Exercise, &exercise.name, exercise).await
    }

    async fn load_exercise(&self, name: &str) -> Result<Option<Exercise>> {
        self.get(RecordKind::Exercise, name).await
    }

    async fn list_exercises(&self, filter: &ExerciseFilter) -> Result<Vec<Exercise>> {
        let all: Vec<Exercise> = self.list(RecordKind::Exercise).await?;
        Ok(all.into_iter().filter(|e| filter.matches(e)).collect())
    }

    async fn delete_exercise(&self, name: &str) -> Result<()> {
        self.remove(RecordKind::Exercise, name).await
    }

    async fn create_routine(&self, routine: &Routine) -> Result<()> {
        self.insert(RecordKind::Routine, &routine.name, routine).await
    }

    async fn load_routine(&self, name: &str) -> Result<Option<Routine>> {
        self.get(RecordKind::Routine, name).await
    }

    async fn list_routines(&self) -> Result<Vec<Routine>> {
        self.list(RecordKind::Routine).await
    }

    async fn append_routine_entry(&self, routine: &str, entry: &RoutineEntry) -> Result<Routine> {
        let Some(mut loaded) = self.load_routine(routine).await? else {
            return Err(StorageError::not_found(RecordKind::Routine, routine));
        };
        loaded.entries.push(entry.clone());
        self.replace(RecordKind::Routine, routine, &loaded).await?;
        Ok(loaded)
    }

    async fn delete_routine(&self, name: &str) -> Result<()> {
        self.remove(RecordKind::Routine, name).await
    }

    async fn create_goal(&self, goal: &Goal) -> Result<()> {
        self.insert(RecordKind::Goal, &goal.exercise, goal).await
    }

    async fn update_goal(&self, goal: &Goal) -> Result<()> {
        self.replace(RecordKind::Goal, &goal.exercise, goal).await
    }

    async fn load_goal(&self, exercise: &str) -> Result<Option<Goal>> {
        self.get(RecordKind::Goal, exercise).await
    }

    async fn list_goals(&self) -> Result<Vec<Goal>> {
        self.list(RecordKind::Goal).await
    }

    async fn delete_goal(&self, exercise: &str) -> Result<()> {
        self.remove(RecordKind::Goal, exercise).await
    }
}

fn kind_dir(root: &Path, kind: RecordKind) -> PathBuf {
    let dir = match kind {
        RecordKind::Exercise => "exercises",
        RecordKind::Routine => "routines",
        RecordKind::Goal => "goals",
    };
    root.join(dir)
}

async fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    let tmp = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&tmp, json.as_bytes()).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    if let Err(e) = fs::rename(&tmp, path).await {
        let _ = fs::remove_file(&tmp).await;
        return Err(e.into());
    }
    Ok(())
}

async fn read_envelope<T: DeserializeOwned>(path: &Path) -> Result<Option<Envelope<T>>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Read an envelope, treating one stored under a different key as absent.
async fn read_keyed<T: DeserializeOwned>(
    path: &Path,
    key: &str,
) -> Result<Option<Envelope<T>>> {
    match read_envelope::<T>(path).await? {
        Some(envelope) if envelope.key == key => Ok(Some(envelope)),
        Some(envelope) => {
            warn!("Record {} holds key '{}', not '{}'", path.display(), envelope.key, key);
            Ok(None)
        }
        None => Ok(None),
    }
}
