#![cfg_attr(
    not(test),
    deny(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::unimplemented,
        clippy::todo,
        clippy::indexing_slicing
    )
)]

//! Document-store backends for the sortlab service.
//!
//! Two implementations of `sortlab_api::ExerciseStore` live here: a
//! redb-backed persistent store used by the running service, and an
//! in-memory store used as a test substitute. Both take the place of the
//! original deployment's shared Mongo collection handle; the handle is now
//! an explicit value constructed once and passed to the gateway.

pub mod memory;
pub mod redb_store;

pub use memory::MemoryExerciseStore;
pub use redb_store::RedbExerciseStore;
