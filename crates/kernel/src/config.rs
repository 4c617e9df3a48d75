use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("target_count must be at least 1")]
    NoTargets,
    #[error("round_seconds must be at least 1")]
    ZeroRound,
    #[error("{field} must be positive, got {value}")]
    NonPositive { field: &'static str, value: f32 },
}

/// Gameplay tuning. Defaults give the standard sixty-second round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Live targets kept in the arena at all times.
    pub target_count: usize,
    pub points_per_hit: u32,
    pub round_seconds: u32,
    /// Targets spawn uniformly in `[-h, h)` on x and z.
    pub arena_half_extent: f32,
    /// Height of a target's center above the floor.
    pub target_height: f32,
    pub target_half_extents: Vec3,
    pub eye_height: f32,
    /// Horizontal velocity decay rate (per second).
    pub damping: f32,
    pub gravity: f32,
    pub move_accel: f32,
    pub jump_impulse: f32,
    /// Maximum ray length for a shot.
    pub fire_range: f32,
    /// Radians of view rotation per pixel of mouse motion.
    pub look_sensitivity: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            target_count: 20,
            points_per_hit: 10,
            round_seconds: 60,
            arena_half_extent: 50.0,
            target_height: 1.0,
            target_half_extents: Vec3::new(0.5, 1.0, 0.5),
            eye_height: 1.6,
            damping: 10.0,
            gravity: 9.8 * 100.0,
            move_accel: 400.0,
            jump_impulse: 350.0,
            fire_range: 100.0,
            look_sensitivity: 0.002,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.target_count == 0 {
            return Err(ConfigError::NoTargets);
        }
        if self.round_seconds == 0 {
            return Err(ConfigError::ZeroRound);
        }
        for (field, value) in [
            ("arena_half_extent", self.arena_half_extent),
            ("eye_height", self.eye_height),
            ("fire_range", self.fire_range),
        ] {
            if value <= 0.0 || value.is_nan() {
                return Err(ConfigError::NonPositive { field, value });
            }
        }
        Ok(())
    }
}
