//! In-memory exercise store, the test substitute for the redb backend.

use async_trait::async_trait;
use sortlab_api::ExerciseStore;
use sortlab_types::{CreateExercise, Exercise, ExerciseId, ExercisePatch, StoreError};
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// A `HashMap` behind the same trait as the persistent store.
#[derive(Clone, Default)]
pub struct MemoryExerciseStore {
    records: Arc<RwLock<HashMap<ExerciseId, Exercise>>>,
}

impl MemoryExerciseStore {
    pub fn new() -> Self {
        Self::default()
    }
}

// Lock poisoning only happens if a writer panicked; surface it as a backend
// failure rather than propagating the panic.
fn poisoned<T>(_: T) -> StoreError {
    StoreError::Backend("store lock poisoned".to_string())
}

#[async_trait]
impl ExerciseStore for MemoryExerciseStore {
    async fn insert(&self, new: CreateExercise) -> Result<Exercise, StoreError> {
        let exercise = new.into_exercise(ExerciseId::generate());
        self.records
            .write()
            .map_err(poisoned)?
            .insert(exercise.id, exercise.clone());
        Ok(exercise)
    }

    async fn list(&self) -> Result<Vec<Exercise>, StoreError> {
        Ok(self.records.read().map_err(poisoned)?.values().cloned().collect())
    }

    async fn get(&self, id: &ExerciseId) -> Result<Exercise, StoreError> {
        self.records
            .read()
            .map_err(poisoned)?
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn update(&self, id: &ExerciseId, patch: ExercisePatch) -> Result<Exercise, StoreError> {
        let mut records = self.records.write().map_err(poisoned)?;
        let exercise = records.get_mut(id).ok_or(StoreError::NotFound)?;
        exercise.apply_patch(patch);
        Ok(exercise.clone())
    }

    async fn delete(&self, id: &ExerciseId) -> Result<(), StoreError> {
        match self.records.write().map_err(poisoned)?.remove(id) {
            Some(_) => Ok(()),
            None => Err(StoreError::NotFound),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn behaves_like_the_persistent_store() {
        let store = MemoryExerciseStore::new();
        let created = store
            .insert(CreateExercise {
                name: None,
                description: None,
                array: vec![2, 1],
                instructions: None,
            })
            .await
            .unwrap();
        assert_eq!(store.get(&created.id).await.unwrap(), created);

        let updated = store
            .update(
                &created.id,
                ExercisePatch {
                    name: Some("named later".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name.as_deref(), Some("named later"));
        assert_eq!(updated.array, vec![2, 1]);

        store.delete(&created.id).await.unwrap();
        assert!(matches!(
            store.get(&created.id).await.unwrap_err(),
            StoreError::NotFound
        ));
    }
}
