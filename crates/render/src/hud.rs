use gallery_kernel::{GameSession, RoundPhase};

/// What the overlay shows for the current session state.
///
/// The score and timer labels are always present; the instructions panel
/// shows whenever the view is not locked, and the crosshair only while it is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HudView {
    pub score_text: String,
    pub timer_text: String,
    pub show_instructions: bool,
    pub show_crosshair: bool,
    pub instructions: &'static str,
}

impl HudView {
    pub fn from_session(session: &GameSession) -> Self {
        let locked = session.is_locked();
        let instructions = match session.phase() {
            RoundPhase::Ended => "Round over",
            RoundPhase::Inactive if session.has_started() => {
                "Paused - click to resume"
            }
            _ => "Click to play\nWASD / arrows: move   Space: jump   Click: shoot   Esc: pause",
        };
        Self {
            score_text: format!("Score: {}", session.score()),
            timer_text: format!("Time: {}", session.time_left()),
            show_instructions: !locked,
            show_crosshair: locked,
            instructions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gallery_kernel::GameConfig;

    #[test]
    fn instructions_follow_lock_state() {
        let mut s = GameSession::new(GameConfig::default(), 1).unwrap();
        let hud = HudView::from_session(&s);
        assert!(hud.show_instructions);
        assert!(!hud.show_crosshair);
        assert!(hud.instructions.starts_with("Click to play"));
        assert_eq!(hud.score_text, "Score: 0");
        assert_eq!(hud.timer_text, "Time: 60");

        s.acquire_lock();
        let hud = HudView::from_session(&s);
        assert!(!hud.show_instructions);
        assert!(hud.show_crosshair);

        s.tick_second();
        s.release_lock();
        let hud = HudView::from_session(&s);
        assert!(hud.show_instructions);
        assert_eq!(hud.timer_text, "Time: 59");
        assert!(hud.instructions.starts_with("Paused"));
    }

    #[test]
    fn pause_before_first_tick_reads_paused() {
        let mut s = GameSession::new(GameConfig::default(), 1).unwrap();
        s.acquire_lock();
        s.release_lock();
        let hud = HudView::from_session(&s);
        assert_eq!(hud.timer_text, "Time: 60");
        assert!(hud.instructions.starts_with("Paused"));
    }
}
