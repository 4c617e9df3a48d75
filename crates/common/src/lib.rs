//! Shared value types used across the gallery crates.

pub mod types;

pub use types::{MoveIntent, Rgb, ScoreReceipt, ScoreSubmission, TargetId};
