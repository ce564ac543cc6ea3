//! Persistent exercise store backed by a single redb table.

use async_trait::async_trait;
use redb::{Database, ReadableTable, TableDefinition};
use sortlab_api::ExerciseStore;
use sortlab_types::{CreateExercise, Exercise, ExerciseId, ExercisePatch, StoreError};
use std::path::Path;
use std::sync::Arc;

/// ---- Table definitions (single DB) ----
/// Raw 12-byte exercise id -> JSON document bytes.
const EXERCISES: TableDefinition<&[u8; 12], &[u8]> = TableDefinition::new("EXERCISES");

fn backend_err(e: impl std::fmt::Display) -> StoreError {
    StoreError::Backend(e.to_string())
}

fn encode_doc(exercise: &Exercise) -> Result<Vec<u8>, StoreError> {
    serde_json::to_vec(exercise).map_err(|e| StoreError::Encode(e.to_string()))
}

fn decode_doc(bytes: &[u8]) -> Result<Exercise, StoreError> {
    serde_json::from_slice(bytes).map_err(|e| StoreError::Decode(e.to_string()))
}

/// An exercise document store persisted in one redb database file.
///
/// Every operation is a single transaction; concurrent updates of the same
/// id are last-write-wins. The store is cheap to clone and is shared with
/// the gateway behind `Arc<dyn ExerciseStore>`.
#[derive(Clone)]
pub struct RedbExerciseStore {
    db: Arc<Database>,
}

impl RedbExerciseStore {
    /// Opens (or creates) the database file and ensures the table exists.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref()).map_err(backend_err)?;
        {
            let w = db.begin_write().map_err(backend_err)?;
            w.open_table(EXERCISES).map_err(backend_err)?;
            w.commit().map_err(backend_err)?;
        }
        tracing::info!(target: "storage", path = %path.as_ref().display(), "opened exercise store");
        Ok(Self { db: Arc::new(db) })
    }

    fn read_one(&self, id: &ExerciseId) -> Result<Exercise, StoreError> {
        let r = self.db.begin_read().map_err(backend_err)?;
        let table = r.open_table(EXERCISES).map_err(backend_err)?;
        let result = match table.get(id.as_bytes()).map_err(backend_err)? {
            Some(guard) => decode_doc(guard.value()),
            None => Err(StoreError::NotFound),
        };
        result
    }

    fn write_doc(&self, exercise: &Exercise) -> Result<(), StoreError> {
        let doc = encode_doc(exercise)?;
        let w = self.db.begin_write().map_err(backend_err)?;
        {
            let mut table = w.open_table(EXERCISES).map_err(backend_err)?;
            table
                .insert(exercise.id.as_bytes(), doc.as_slice())
                .map_err(backend_err)?;
        }
        w.commit().map_err(backend_err)
    }
}

#[async_trait]
impl ExerciseStore for RedbExerciseStore {
    async fn insert(&self, new: CreateExercise) -> Result<Exercise, StoreError> {
        let exercise = new.into_exercise(ExerciseId::generate());
        self.write_doc(&exercise)?;
        tracing::debug!(target: "storage", id = %exercise.id, "inserted exercise");
        Ok(exercise)
    }

    async fn list(&self) -> Result<Vec<Exercise>, StoreError> {
        let r = self.db.begin_read().map_err(backend_err)?;
        let table = r.open_table(EXERCISES).map_err(backend_err)?;
        let mut all = Vec::new();
        for entry in table.iter().map_err(backend_err)? {
            let (_, value) = entry.map_err(backend_err)?;
            all.push(decode_doc(value.value())?);
        }
        Ok(all)
    }

    async fn get(&self, id: &ExerciseId) -> Result<Exercise, StoreError> {
        self.read_one(id)
    }

    async fn update(&self, id: &ExerciseId, patch: ExercisePatch) -> Result<Exercise, StoreError> {
        // Read-merge-write inside one write transaction so a concurrent
        // update cannot interleave between the read and the write.
        let w = self.db.begin_write().map_err(backend_err)?;
        let merged = {
            let mut table = w.open_table(EXERCISES).map_err(backend_err)?;
            let mut current = {
                let guard = table.get(id.as_bytes()).map_err(backend_err)?;
                match guard {
                    Some(v) => decode_doc(v.value())?,
                    None => return Err(StoreError::NotFound),
                }
            };
            current.apply_patch(patch);
            let doc = encode_doc(&current)?;
            table
                .insert(id.as_bytes(), doc.as_slice())
                .map_err(backend_err)?;
            current
        };
        w.commit().map_err(backend_err)?;
        tracing::debug!(target: "storage", id = %id, "updated exercise");
        Ok(merged)
    }

    async fn delete(&self, id: &ExerciseId) -> Result<(), StoreError> {
        let w = self.db.begin_write().map_err(backend_err)?;
        let removed = {
            let mut table = w.open_table(EXERCISES).map_err(backend_err)?;
            let removed = table.remove(id.as_bytes()).map_err(backend_err)?.is_some();
            removed
        };
        w.commit().map_err(backend_err)?;
        if removed {
            tracing::debug!(target: "storage", id = %id, "deleted exercise");
            Ok(())
        } else {
            Err(StoreError::NotFound)
        }
    }
}
