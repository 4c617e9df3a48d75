//! Input tracking: discrete key events in, per-frame intent out.
//!
//! # Invariants
//! - Raw key state is tracked whether or not the view is locked.
//! - A jump press is delivered to exactly one frame.

pub mod action;

pub use action::{Action, InputState};
