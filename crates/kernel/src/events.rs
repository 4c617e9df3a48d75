use gallery_common::TargetId;
use glam::Vec3;
use serde::{Deserialize, Serialize};

/// A record produced by every observable change to the session.
///
/// The log is append-only; the client and CLI drain it to drive logs,
/// HUD flashes, and test assertions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// View lock acquired on a fresh round.
    RoundStarted { time_left: u32 },
    /// View lock re-acquired mid-round.
    RoundResumed { time_left: u32, score: u32 },
    /// View lock lost mid-round.
    RoundPaused { time_left: u32, score: u32 },
    /// A shot struck a target.
    TargetHit {
        id: TargetId,
        distance: f32,
        score: u32,
    },
    /// A target entered the arena.
    TargetSpawned { id: TargetId, position: Vec3 },
    /// Countdown reached zero.
    RoundEnded { score: u32 },
    /// Score and countdown restored after the round-end sequence.
    RoundReset { time_left: u32 },
}
