//! Game-side glue for the desktop client: key mapping, frame and timer
//! scheduling, the round-end sequence, and the HUD.
//!
//! Nothing here touches the GPU or the window, so it runs under test.

use egui::Context as EguiContext;
use gallery_input::{Action, InputState};
use gallery_kernel::{GameSession, Hit, IntervalClock, RoundSummary};
use gallery_render::HudView;
use gallery_report::ScoreSink;
use std::time::{Duration, Instant};
use winit::event::MouseButton;
use winit::keyboard::KeyCode;

/// Longest frame step fed to the integrator.
const MAX_FRAME_DELTA: Duration = Duration::from_millis(100);

pub fn action_for(key: KeyCode) -> Option<Action> {
    match key {
        KeyCode::KeyW | KeyCode::ArrowUp => Some(Action::MoveForward),
        KeyCode::KeyS | KeyCode::ArrowDown => Some(Action::MoveBackward),
        KeyCode::KeyA | KeyCode::ArrowLeft => Some(Action::MoveLeft),
        KeyCode::KeyD | KeyCode::ArrowRight => Some(Action::MoveRight),
        KeyCode::Space => Some(Action::Jump),
        KeyCode::Escape => Some(Action::Unlock),
        _ => None,
    }
}

pub fn action_for_button(button: MouseButton) -> Option<Action> {
    match button {
        MouseButton::Left => Some(Action::Fire),
        _ => None,
    }
}

/// What a primary click should do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Click {
    /// View is locked: a shot was fired.
    Fired(Option<Hit>),
    /// View is free and the round can run: the caller should grab the cursor.
    RequestLock,
    /// A round-end dialog is waiting for acknowledgement.
    Ignored,
}

pub struct GameApp {
    pub session: GameSession,
    pub input: InputState,
    clock: IntervalClock,
    reporter: Box<dyn ScoreSink>,
    pending_end: Option<RoundSummary>,
    last_frame: Instant,
    last_hit_at: Option<Instant>,
}

impl GameApp {
    pub fn new(session: GameSession, reporter: Box<dyn ScoreSink>, now: Instant) -> Self {
        Self {
            session,
            input: InputState::new(),
            clock: IntervalClock::start(now),
            reporter,
            pending_end: None,
            last_frame: now,
            last_hit_at: None,
        }
    }

    pub fn is_locked(&self) -> bool {
        self.session.is_locked()
    }

    /// Keyboard event. Returns true if the view lock should be released.
    pub fn key(&mut self, key: KeyCode, pressed: bool) -> bool {
        let Some(action) = action_for(key) else {
            return false;
        };
        if !pressed {
            self.input.release(action);
            return false;
        }
        self.input.press(action) && action == Action::Unlock && self.is_locked()
    }

    /// Mouse button press. `None` if the button has no binding.
    pub fn button(&mut self, button: MouseButton) -> Option<Click> {
        let action = action_for_button(button)?;
        self.input.press(action).then(|| self.click())
    }

    pub fn click(&mut self) -> Click {
        if self.is_locked() {
            let hit = self.session.fire();
            if hit.is_some() {
                self.last_hit_at = Some(Instant::now());
            }
            return Click::Fired(hit);
        }
        if self.pending_end.is_some() {
            return Click::Ignored;
        }
        Click::RequestLock
    }

    /// The cursor grab succeeded.
    pub fn lock_acquired(&mut self) -> bool {
        self.session.acquire_lock()
    }

    /// The cursor grab was released (Escape, focus loss, round end).
    pub fn lock_lost(&mut self) {
        self.session.release_lock();
    }

    pub fn mouse_motion(&mut self, dx: f64, dy: f64) {
        self.session.look(dx as f32, dy as f32);
    }

    /// Per-frame update with real elapsed time since the previous frame.
    pub fn frame(&mut self, now: Instant) {
        let delta = now
            .saturating_duration_since(self.last_frame)
            .min(MAX_FRAME_DELTA);
        self.last_frame = now;
        let jump = self.input.take_jump();
        self.session
            .advance(delta.as_secs_f32(), self.input.intent(), jump);
    }

    /// Drive the one-second countdown. Returns the summary when this poll
    /// ended the round; the caller must then release the view lock.
    pub fn poll_timer(&mut self, now: Instant) -> Option<RoundSummary> {
        let mut ended = None;
        for _ in 0..self.clock.poll(now) {
            if let Some(summary) = self.session.tick_second() {
                ended = Some(summary);
            }
        }
        if let Some(summary) = ended {
            self.pending_end = Some(summary);
        }
        ended
    }

    /// The player dismissed the round-end dialog: reset the round and send
    /// the score. Returns the submitted score.
    pub fn acknowledge_round_end(&mut self) -> Option<u32> {
        self.pending_end.take()?;
        let summary = self.session.reset_round()?;
        self.reporter.submit(summary.score);
        Some(summary.score)
    }

    pub fn draw_ui(&mut self, ctx: &EguiContext) {
        let hud = HudView::from_session(&self.session);

        egui::Area::new(egui::Id::new("hud"))
            .anchor(egui::Align2::LEFT_TOP, egui::vec2(12.0, 12.0))
            .interactable(false)
            .show(ctx, |ui| {
                let text = |s: &str| {
                    egui::RichText::new(s)
                        .size(22.0)
                        .strong()
                        .color(egui::Color32::WHITE)
                };
                ui.label(text(&hud.score_text));
                ui.label(text(&hud.timer_text));
            });

        if hud.show_instructions && self.pending_end.is_none() {
            egui::Area::new(egui::Id::new("instructions"))
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .interactable(false)
                .show(ctx, |ui| {
                    egui::Frame::popup(ui.style()).show(ui, |ui| {
                        ui.heading("Shooting Gallery");
                        ui.label(hud.instructions);
                    });
                });
        }

        if hud.show_crosshair {
            let painter = ctx.layer_painter(egui::LayerId::new(
                egui::Order::Foreground,
                egui::Id::new("crosshair"),
            ));
            let c = ctx.screen_rect().center();
            let color = match self.last_hit_at {
                Some(t) if t.elapsed() < Duration::from_millis(150) => egui::Color32::RED,
                _ => egui::Color32::WHITE,
            };
            let stroke = egui::Stroke::new(2.0, color);
            painter.line_segment([c - egui::vec2(8.0, 0.0), c + egui::vec2(8.0, 0.0)], stroke);
            painter.line_segment([c - egui::vec2(0.0, 8.0), c + egui::vec2(0.0, 8.0)], stroke);
        }

        if let Some(summary) = self.pending_end {
            let mut acknowledged = false;
            egui::Window::new("Game Over")
                .collapsible(false)
                .resizable(false)
                .anchor(egui::Align2::CENTER_CENTER, egui::Vec2::ZERO)
                .show(ctx, |ui| {
                    ui.label(format!("Game Over! Score: {}", summary.score));
                    ui.label(format!("Targets hit: {}", summary.hits));
                    if ui.button("OK").clicked() {
                        acknowledged = true;
                    }
                });
            if acknowledged {
                self.acknowledge_round_end();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_kernel::{GameConfig, RoundPhase};
    use gallery_report::RecordingSink;

    fn app(now: Instant) -> (GameApp, RecordingSink) {
        let sink = RecordingSink::new();
        let session = GameSession::new(GameConfig::default(), 42).unwrap();
        (GameApp::new(session, Box::new(sink.clone()), now), sink)
    }

    #[test]
    fn wasd_and_arrows_map_to_movement() {
        assert_eq!(action_for(KeyCode::KeyW), Some(Action::MoveForward));
        assert_eq!(action_for(KeyCode::ArrowUp), Some(Action::MoveForward));
        assert_eq!(action_for(KeyCode::ArrowLeft), Some(Action::MoveLeft));
        assert_eq!(action_for(KeyCode::KeyD), Some(Action::MoveRight));
        assert_eq!(action_for(KeyCode::Space), Some(Action::Jump));
        assert_eq!(action_for(KeyCode::KeyQ), None);
    }

    #[test]
    fn click_requests_lock_then_fires() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        assert_eq!(app.click(), Click::RequestLock);
        assert!(app.lock_acquired());
        assert!(matches!(app.click(), Click::Fired(_)));
    }

    #[test]
    fn only_the_primary_button_fires() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        assert_eq!(action_for_button(MouseButton::Left), Some(Action::Fire));
        assert_eq!(app.button(MouseButton::Right), None);
        assert_eq!(app.button(MouseButton::Left), Some(Click::RequestLock));
        app.lock_acquired();
        assert!(matches!(app.button(MouseButton::Left), Some(Click::Fired(_))));
        assert_eq!(app.button(MouseButton::Middle), None);
        assert_eq!(app.session.time_left(), 60);
    }

    #[test]
    fn escape_releases_only_when_locked() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        assert!(!app.key(KeyCode::Escape, true));
        app.lock_acquired();
        assert!(app.key(KeyCode::Escape, true));
    }

    #[test]
    fn idle_round_submits_zero_exactly_once() {
        let t0 = Instant::now();
        let (mut app, sink) = app(t0);
        app.lock_acquired();

        let mut ends = 0;
        for s in 1..=59 {
            ends += app.poll_timer(t0 + Duration::from_secs(s)).is_some() as u32;
        }
        assert_eq!(ends, 0);
        assert_eq!(app.session.time_left(), 1);

        let summary = app.poll_timer(t0 + Duration::from_secs(60)).unwrap();
        assert_eq!(summary.score, 0);
        assert_eq!(app.session.phase(), RoundPhase::Ended);
        assert!(app.poll_timer(t0 + Duration::from_secs(70)).is_none());

        // Nothing is sent until the player acknowledges.
        assert!(sink.submitted().is_empty());
        assert_eq!(app.click(), Click::Ignored);

        assert_eq!(app.acknowledge_round_end(), Some(0));
        assert_eq!(app.acknowledge_round_end(), None);
        assert_eq!(sink.submitted(), vec![0]);
        assert_eq!(app.session.time_left(), 60);
        assert_eq!(app.click(), Click::RequestLock);
    }

    #[test]
    fn timer_is_frozen_while_unlocked() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        app.poll_timer(t0 + Duration::from_secs(10));
        assert_eq!(app.session.time_left(), 60);
        app.lock_acquired();
        app.poll_timer(t0 + Duration::from_secs(13));
        assert_eq!(app.session.time_left(), 57);
    }

    #[test]
    fn frame_delta_is_clamped() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        app.lock_acquired();
        app.key(KeyCode::KeyW, true);
        app.frame(t0 + Duration::from_secs(5));
        // A clamped 0.1 s step moves 400 * 0.1 * 0.1 = 4 units at most.
        let moved = app.session.player().position.z.abs();
        assert!(moved > 0.0 && moved <= 4.0 + 1e-3);
    }

    #[test]
    fn jump_press_reaches_one_frame() {
        let t0 = Instant::now();
        let (mut app, _) = app(t0);
        app.lock_acquired();
        app.key(KeyCode::Space, true);
        app.frame(t0 + Duration::from_millis(16));
        assert!(!app.session.player().can_jump);
        assert!(!app.input.take_jump());
    }
}
