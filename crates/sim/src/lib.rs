//! Pure interaction logic for the sorting exercises.
//!
//! Everything in this crate is deterministic and free of I/O: the stepwise
//! insertion-sort simulation driven by the demo view, the slot-snapping math
//! used when a dragged element is dropped onto the compartment box, and the
//! move history backing the exercise view's undo button. The rendering and
//! gesture plumbing that call into these functions live in the (separate)
//! front end.

pub mod history;
pub mod sim;
pub mod slots;

pub use history::{move_element, DropOutcome, MoveHistory};
pub use sim::{is_sorted, SortSim};
pub use slots::{nearest_slot, slot_center};
