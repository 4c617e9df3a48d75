use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a live target.
///
/// Targets carry no identity beyond "this object"; the id exists so the hit
/// resolver and renderer can refer to one without holding a borrow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TargetId(pub Uuid);

impl TargetId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First eight hex digits, for logs and debug output.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for TargetId {
    fn default() -> Self {
        Self::new()
    }
}

/// 24-bit display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u32);

impl Rgb {
    pub const SKY: Rgb = Rgb(0x87ceeb);
    pub const FLOOR: Rgb = Rgb(0x555555);

    /// Build from any integer, keeping the low 24 bits.
    pub fn from_u32(value: u32) -> Self {
        Self(value & 0x00ff_ffff)
    }

    pub fn r(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn g(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn b(&self) -> u8 {
        self.0 as u8
    }

    /// Linear-ish float RGBA with alpha 1, as consumed by vertex buffers.
    pub fn to_rgba_f32(&self) -> [f32; 4] {
        [
            self.r() as f32 / 255.0,
            self.g() as f32 / 255.0,
            self.b() as f32 / 255.0,
            1.0,
        ]
    }
}

/// Which movement keys are currently held.
///
/// Produced by the input tracker and read once per frame by the locomotion
/// integrator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveIntent {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveIntent {
    /// Axis values in the view-local frame: (right, forward), each in -1..=1.
    pub fn axes(&self) -> (f32, f32) {
        let x = self.right as i8 - self.left as i8;
        let z = self.forward as i8 - self.backward as i8;
        (x as f32, z as f32)
    }

    pub fn any_longitudinal(&self) -> bool {
        self.forward || self.backward
    }

    pub fn any_lateral(&self) -> bool {
        self.left || self.right
    }
}

/// Body of `POST /save_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    #[serde(default)]
    pub score: u32,
}

/// Response of `POST /save_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreReceipt {
    pub status: String,
    pub score: u32,
}

impl ScoreReceipt {
    pub fn success(score: u32) -> Self {
        Self {
            status: "success".into(),
            score,
        }
    }
}
