//! Backend-facing traits for the sortlab service.
//!
//! The gateway talks to storage exclusively through [`store::ExerciseStore`],
//! so backends can be swapped (persistent redb in production, in-memory in
//! tests) without touching request-handling code.

pub mod store;

pub use store::ExerciseStore;
