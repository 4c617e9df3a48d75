use crate::config::{ConfigError, GameConfig};
use crate::events::GameEvent;
use crate::player::{Look, PlayerState};
use crate::ray::Ray;
use crate::round::{LockChange, RoundPhase, RoundTimer};
use crate::target::{Hit, TargetPool};
use gallery_common::MoveIntent;
use glam::Vec3;

/// Final numbers of a finished round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundSummary {
    pub score: u32,
    pub hits: u32,
}

/// One game session: the player, the arena, the round and the score.
///
/// All game state lives here with a single owner. The frame loop calls
/// [`advance`](Self::advance) and the one-second interval calls
/// [`tick_second`](Self::tick_second); the two touch disjoint state except
/// for the phase, which only the timer moves to `Ended`.
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    player: PlayerState,
    targets: TargetPool,
    round: RoundTimer,
    score: u32,
    hits: u32,
    event_log: Vec<GameEvent>,
}

impl GameSession {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let targets = TargetPool::new(&config, seed);
        let event_log = targets
            .iter()
            .map(|t| GameEvent::TargetSpawned {
                id: t.id,
                position: t.position,
            })
            .collect();
        Ok(Self {
            player: PlayerState::spawn(&config),
            round: RoundTimer::new(config.round_seconds),
            targets,
            config,
            score: 0,
            hits: 0,
            event_log,
        })
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerState {
        &self.player
    }

    pub fn targets(&self) -> &TargetPool {
        &self.targets
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn time_left(&self) -> u32 {
        self.round.time_left()
    }

    pub fn phase(&self) -> RoundPhase {
        self.round.phase()
    }

    /// True once the current round has been entered, including while paused.
    pub fn has_started(&self) -> bool {
        self.round.started()
    }

    /// True while the view is locked and the round is running.
    pub fn is_locked(&self) -> bool {
        self.round.is_active()
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.event_log
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// View lock acquired. Returns false if the lock is refused because a
    /// finished round has not been reset yet.
    pub fn acquire_lock(&mut self) -> bool {
        let time_left = self.round.time_left();
        match self.round.acquire() {
            LockChange::Started => {
                tracing::info!("round started ({time_left}s)");
                self.event_log.push(GameEvent::RoundStarted { time_left });
                true
            }
            LockChange::Resumed => {
                tracing::info!("round resumed at {time_left}s, score {}", self.score);
                self.event_log.push(GameEvent::RoundResumed {
                    time_left,
                    score: self.score,
                });
                true
            }
            LockChange::Unchanged => true,
            LockChange::Refused => false,
        }
    }

    /// View lock released. A running round pauses with its progress intact.
    pub fn release_lock(&mut self) {
        if self.round.release() {
            tracing::info!("round paused at {}s", self.round.time_left());
            self.event_log.push(GameEvent::RoundPaused {
                time_left: self.round.time_left(),
                score: self.score,
            });
        }
    }

    /// Mouse look. Ignored unless locked.
    pub fn look(&mut self, dx: f32, dy: f32) {
        if self.is_locked() {
            self.player
                .look
                .rotate(dx, dy, self.config.look_sensitivity);
        }
    }

    /// One rendered frame of `delta` seconds with the input pulled for it.
    pub fn advance(&mut self, delta: f32, intent: MoveIntent, jump_pressed: bool) {
        if !self.is_locked() {
            return;
        }
        if jump_pressed {
            self.player.jump(&self.config);
        }
        self.player.integrate(&self.config, intent, delta);
    }

    /// Fire along the view. Only honored while locked; hits the nearest
    /// target in range, scores it, and spawns its replacement.
    pub fn fire(&mut self) -> Option<Hit> {
        if !self.is_locked() {
            return None;
        }
        let ray = Ray::new(
            self.player.eye(),
            self.player.look.forward(),
            self.config.fire_range,
        );
        let hit = self.targets.cast(&ray)?;
        let (_, spawned) = self.targets.replace(hit.target)?;
        let spawned = GameEvent::TargetSpawned {
            id: spawned.id,
            position: spawned.position,
        };

        self.score = self.score.saturating_add(self.config.points_per_hit);
        self.hits = self.hits.saturating_add(1);
        tracing::debug!(
            "hit {} at {:.1}m, score {}",
            hit.target.short(),
            hit.distance,
            self.score
        );
        self.event_log.push(GameEvent::TargetHit {
            id: hit.target,
            distance: hit.distance,
            score: self.score,
        });
        self.event_log.push(spawned);
        Some(hit)
    }

    /// One wall-clock second elapsed. Returns the summary exactly once per
    /// round, on the tick that ends it.
    pub fn tick_second(&mut self) -> Option<RoundSummary> {
        if !self.round.tick() {
            return None;
        }
        tracing::info!("round over, score {}", self.score);
        self.event_log
            .push(GameEvent::RoundEnded { score: self.score });
        Some(self.summary())
    }

    /// Finish the round-end sequence: restore score and countdown and go
    /// back to waiting for a lock. Only acts on an ended round.
    pub fn reset_round(&mut self) -> Option<RoundSummary> {
        if self.round.phase() != RoundPhase::Ended {
            return None;
        }
        let summary = self.summary();
        self.round.reset();
        self.score = 0;
        self.hits = 0;
        self.event_log.push(GameEvent::RoundReset {
            time_left: self.round.time_left(),
        });
        Some(summary)
    }

    /// Score and hit count so far.
    pub fn summary(&self) -> RoundSummary {
        RoundSummary {
            score: self.score,
            hits: self.hits,
        }
    }

    /// Point the view straight at a target. Used by scripted runs and tests.
    pub fn aim_at(&mut self, position: Vec3) {
        self.player.look = Look::toward(self.player.eye(), position);
    }
}
