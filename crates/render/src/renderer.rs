use crate::hud::HudView;
use gallery_kernel::GameSession;
use std::fmt::Write;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the session and produces output. It never mutates
/// game state.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame of the session.
    fn render(&self, session: &GameSession) -> Self::Output;
}

/// Plain-text renderer for headless runs and logs.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// List every target, not just the count.
    pub list_targets: bool,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_targets() -> Self {
        Self { list_targets: true }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, session: &GameSession) -> String {
        let hud = HudView::from_session(session);
        let player = session.player();
        let eye = player.eye();
        let fwd = player.look.forward();

        let mut out = String::new();
        let _ = writeln!(
            out,
            "=== {} | {} | {:?} ===",
            hud.score_text,
            hud.timer_text,
            session.phase()
        );
        let _ = writeln!(
            out,
            "Player: eye=({:.2}, {:.2}, {:.2}) look=({:.2}, {:.2}, {:.2}) grounded={}",
            eye.x, eye.y, eye.z, fwd.x, fwd.y, fwd.z, player.can_jump
        );
        let _ = writeln!(out, "Targets: {}", session.targets().len());
        if self.list_targets {
            for t in session.targets().iter() {
                let _ = writeln!(
                    out,
                    "  [{}] pos=({:.2}, {:.2}, {:.2}) color=#{:06x} dist={:.1}",
                    t.id.short(),
                    t.position.x,
                    t.position.y,
                    t.position.z,
                    t.color.0,
                    t.position.distance(eye)
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_kernel::GameConfig;

    #[test]
    fn summary_only_by_default() {
        let s = GameSession::new(GameConfig::default(), 5).unwrap();
        let out = DebugTextRenderer::new().render(&s);
        assert!(out.contains("Score: 0"));
        assert!(out.contains("Time: 60"));
        assert!(out.contains("Targets: 20"));
        assert!(!out.contains("pos="));
    }

    #[test]
    fn lists_targets_on_request() {
        let s = GameSession::new(GameConfig::default(), 5).unwrap();
        let out = DebugTextRenderer::with_targets().render(&s);
        assert_eq!(out.matches("pos=").count(), 20);
        assert!(out.contains("color=#"));
    }
}
