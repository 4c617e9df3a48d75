//! Persistence for the score server.
//!
//! # Invariants
//! - The board holds at most [`MAX_ENTRIES`] scores, sorted highest first.
//! - A write either fully replaces the file or leaves the old one intact.

mod store;

pub use store::{MAX_ENTRIES, ScoreBoard, StoreError};
