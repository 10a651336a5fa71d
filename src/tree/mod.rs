//! Traversal of read-only source trees

pub mod walker;

pub use walker::{walk, WalkEntry, WalkSummary, Walker};
