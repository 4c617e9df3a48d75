//! Game kernel: the authoritative shooting-gallery session.
//!
//! # Invariants
//! - The live target set holds `target_count` targets after every hit.
//! - The countdown only moves while the view is locked, and the round-end
//!   summary is produced exactly once per round.
//! - The player's eye never drops below eye height.
//! - No I/O and no clock reads: time arrives as arguments.

pub mod clock;
pub mod config;
pub mod events;
pub mod player;
pub mod ray;
pub mod rng;
pub mod round;
pub mod session;
pub mod target;

pub use clock::IntervalClock;
pub use config::{ConfigError, GameConfig};
pub use events::GameEvent;
pub use player::{Look, PlayerState};
pub use ray::{Aabb, Ray};
pub use round::RoundPhase;
pub use session::{GameSession, RoundSummary};
pub use target::{Hit, Target, TargetPool};
