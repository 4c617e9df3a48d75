use crate::config::GameConfig;
use gallery_common::MoveIntent;
use glam::Vec3;

const PITCH_LIMIT: f32 = 89.0 * std::f32::consts::PI / 180.0;

/// View orientation: yaw about +Y and pitch, in radians.
///
/// Yaw of -90° looks down -Z, the starting view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Look {
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for Look {
    fn default() -> Self {
        Self {
            yaw: -90.0_f32.to_radians(),
            pitch: 0.0,
        }
    }
}

impl Look {
    /// Full 3D view direction.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    /// View forward projected onto the floor plane.
    pub fn flat_forward(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, self.yaw.sin())
    }

    /// View right, always horizontal.
    pub fn right(&self) -> Vec3 {
        self.flat_forward().cross(Vec3::Y).normalize()
    }

    pub fn rotate(&mut self, dx: f32, dy: f32, sensitivity: f32) {
        self.yaw += dx * sensitivity;
        self.pitch = (self.pitch - dy * sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);
    }

    /// Orientation that looks from `from` toward `to`.
    pub fn toward(from: Vec3, to: Vec3) -> Self {
        let d = (to - from).normalize_or_zero();
        if d == Vec3::ZERO {
            return Self::default();
        }
        Self {
            yaw: d.z.atan2(d.x),
            pitch: d.y.clamp(-1.0, 1.0).asin().clamp(-PITCH_LIMIT, PITCH_LIMIT),
        }
    }
}

/// Player pose and motion state.
///
/// `velocity.x` and `velocity.z` are view-local (+x right, +z forward);
/// `velocity.y` is world vertical.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerState {
    pub position: Vec3,
    pub velocity: Vec3,
    pub look: Look,
    pub can_jump: bool,
}

impl PlayerState {
    pub fn spawn(config: &GameConfig) -> Self {
        Self {
            position: Vec3::new(0.0, config.eye_height, 0.0),
            velocity: Vec3::ZERO,
            look: Look::default(),
            can_jump: true,
        }
    }

    /// Eye position; the ray origin for a shot.
    pub fn eye(&self) -> Vec3 {
        self.position
    }

    /// Apply a jump press. Returns whether the impulse was applied.
    pub fn jump(&mut self, config: &GameConfig) -> bool {
        if !self.can_jump {
            return false;
        }
        self.velocity.y += config.jump_impulse;
        self.can_jump = false;
        true
    }

    /// Advance one frame of `delta` seconds.
    pub fn integrate(&mut self, config: &GameConfig, intent: MoveIntent, delta: f32) {
        self.velocity.x -= self.velocity.x * config.damping * delta;
        self.velocity.z -= self.velocity.z * config.damping * delta;
        self.velocity.y -= config.gravity * delta;

        let (ax, az) = intent.axes();
        let dir = Vec3::new(ax, 0.0, az).normalize_or_zero();
        if intent.any_longitudinal() {
            self.velocity.z += dir.z * config.move_accel * delta;
        }
        if intent.any_lateral() {
            self.velocity.x += dir.x * config.move_accel * delta;
        }

        self.position += self.look.right() * (self.velocity.x * delta);
        self.position += self.look.flat_forward() * (self.velocity.z * delta);
        self.position.y += self.velocity.y * delta;

        if self.position.y < config.eye_height {
            self.velocity.y = 0.0;
            self.position.y = config.eye_height;
            self.can_jump = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forward_only() -> MoveIntent {
        MoveIntent {
            forward: true,
            ..MoveIntent::default()
        }
    }

    #[test]
    fn default_look_faces_negative_z() {
        let look = Look::default();
        assert!((look.forward() - Vec3::NEG_Z).length() < 1e-5);
        assert!((look.right() - Vec3::X).length() < 1e-5);
    }

    #[test]
    fn pitch_is_clamped() {
        let mut look = Look::default();
        look.rotate(0.0, -100_000.0, 0.002);
        assert!(look.pitch <= PITCH_LIMIT);
        look.rotate(0.0, 100_000.0, 0.002);
        assert!(look.pitch >= -PITCH_LIMIT);
    }

    #[test]
    fn walking_ignores_pitch() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        p.look.pitch = 1.2;
        for _ in 0..30 {
            p.integrate(&cfg, forward_only(), 1.0 / 60.0);
        }
        assert!((p.position.y - cfg.eye_height).abs() < 1e-5);
        assert!(p.position.z < 0.0);
        assert!(p.position.x.abs() < 1e-4);
    }

    #[test]
    fn one_frame_matches_integrator_formula() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        let dt = 0.016;
        p.integrate(&cfg, forward_only(), dt);
        // v.z = 0 - 0 + 1 * 400 * dt; displacement = v.z * dt along -Z
        let vz = cfg.move_accel * dt;
        assert!((p.velocity.z - vz).abs() < 1e-5);
        assert!((p.position.z - (-vz * dt)).abs() < 1e-5);
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        let intent = MoveIntent {
            forward: true,
            right: true,
            ..MoveIntent::default()
        };
        p.integrate(&cfg, intent, 0.01);
        let horizontal = Vec3::new(p.velocity.x, 0.0, p.velocity.z).length();
        assert!((horizontal - cfg.move_accel * 0.01).abs() < 1e-3);
    }

    #[test]
    fn idle_velocity_decays() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        p.velocity.x = 50.0;
        p.integrate(&cfg, MoveIntent::default(), 0.01);
        assert!((p.velocity.x - 45.0).abs() < 1e-4);
    }

    #[test]
    fn never_drops_below_eye_height() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        p.velocity.y = -1.0e6;
        for dt in [0.001, 0.1, 0.5, 2.0] {
            p.integrate(&cfg, MoveIntent::default(), dt);
            assert!(p.position.y >= cfg.eye_height);
            assert!(p.can_jump);
            assert_eq!(p.velocity.y, 0.0);
        }
    }

    #[test]
    fn jump_consumes_grounded_flag_until_landing() {
        let cfg = GameConfig::default();
        let mut p = PlayerState::spawn(&cfg);
        assert!(p.jump(&cfg));
        assert_eq!(p.velocity.y, cfg.jump_impulse);
        assert!(!p.can_jump);
        assert!(!p.jump(&cfg));

        p.integrate(&cfg, MoveIntent::default(), 1.0 / 60.0);
        assert!(p.position.y > cfg.eye_height);
        assert!(!p.can_jump);

        for _ in 0..120 {
            p.integrate(&cfg, MoveIntent::default(), 1.0 / 60.0);
        }
        assert!(p.can_jump);
        assert_eq!(p.position.y, cfg.eye_height);
    }

    #[test]
    fn look_toward_points_at_target() {
        let from = Vec3::new(0.0, 1.6, 0.0);
        let to = Vec3::new(10.0, 1.0, -10.0);
        let look = Look::toward(from, to);
        let expected = (to - from).normalize();
        assert!((look.forward() - expected).length() < 1e-4);
    }
}
