//! Core data structures for the sortlab service.
//!
//! Holds the persisted `Exercise` document model, its identifier type, the
//! storage error taxonomy, and shared configuration structures. Kept free of
//! async and I/O so every other crate in the workspace can depend on it.

pub mod config;
pub mod error;
pub mod exercise;

pub use config::ServiceConfig;
pub use error::{ErrorCode, StoreError};
pub use exercise::{CreateExercise, Exercise, ExerciseId, ExercisePatch};
