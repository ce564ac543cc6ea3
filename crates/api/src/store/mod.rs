//! API for the durable exercise document store.

use async_trait::async_trait;
use sortlab_types::{CreateExercise, Exercise, ExerciseId, ExercisePatch, StoreError};

/// A flat collection of exercise documents addressed by id.
///
/// Each call is independent; there are no multi-record transactions and no
/// cross-request ordering guarantees. Concurrent updates of the same id are
/// last-write-wins. Implementations do not retry: backend failures surface
/// as [`StoreError::Backend`].
#[async_trait]
pub trait ExerciseStore: Send + Sync {
    /// Inserts a new record under a store-assigned id and returns it.
    async fn insert(&self, new: CreateExercise) -> Result<Exercise, StoreError>;

    /// Returns all records. Order is unspecified; there is no pagination,
    /// which is an accepted limitation at classroom scale.
    async fn list(&self) -> Result<Vec<Exercise>, StoreError>;

    /// Fetches one record, or [`StoreError::NotFound`].
    async fn get(&self, id: &ExerciseId) -> Result<Exercise, StoreError>;

    /// Merges the patch over the stored record and returns the result.
    /// Strict semantics: [`StoreError::NotFound`] if the id is absent,
    /// never an upsert.
    async fn update(&self, id: &ExerciseId, patch: ExercisePatch) -> Result<Exercise, StoreError>;

    /// Removes one record, or [`StoreError::NotFound`] if nothing matched.
    async fn delete(&self, id: &ExerciseId) -> Result<(), StoreError>;
}
