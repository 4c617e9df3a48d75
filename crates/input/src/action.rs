use gallery_common::MoveIntent;

/// A game action that a key or button maps to.
///
/// The session consumes actions, never raw device events, so any windowing
/// layer can drive it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    MoveForward,
    MoveBackward,
    MoveLeft,
    MoveRight,
    Jump,
    Fire,
    /// Release the view lock.
    Unlock,
}

/// Currently held movement keys plus a pending jump press.
///
/// Updated synchronously by input events; the frame loop reads it with
/// [`intent`](Self::intent) and [`take_jump`](Self::take_jump).
#[derive(Debug, Clone, Default)]
pub struct InputState {
    held: MoveIntent,
    jump_pending: bool,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a press. Returns true if the action is edge-triggered
    /// (fire, unlock) and the caller should act on it now.
    pub fn press(&mut self, action: Action) -> bool {
        match action {
            Action::MoveForward => self.held.forward = true,
            Action::MoveBackward => self.held.backward = true,
            Action::MoveLeft => self.held.left = true,
            Action::MoveRight => self.held.right = true,
            Action::Jump => self.jump_pending = true,
            Action::Fire | Action::Unlock => return true,
        }
        false
    }

    pub fn release(&mut self, action: Action) {
        match action {
            Action::MoveForward => self.held.forward = false,
            Action::MoveBackward => self.held.backward = false,
            Action::MoveLeft => self.held.left = false,
            Action::MoveRight => self.held.right = false,
            Action::Jump | Action::Fire | Action::Unlock => {}
        }
    }

    pub fn intent(&self) -> MoveIntent {
        self.held
    }

    /// Consume the pending jump press, if any.
    pub fn take_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump_pending)
    }

    /// Forget everything held, e.g. when the window loses focus and key-up
    /// events will never arrive.
    pub fn clear(&mut self) {
        if self.held != MoveIntent::default() {
            tracing::debug!("clearing held movement keys");
        }
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_and_release_track_held_keys() {
        let mut input = InputState::new();
        input.press(Action::MoveForward);
        input.press(Action::MoveLeft);
        let intent = input.intent();
        assert!(intent.forward && intent.left);
        assert!(!intent.backward && !intent.right);

        input.release(Action::MoveForward);
        assert!(!input.intent().forward);
        assert!(input.intent().left);
    }

    #[test]
    fn jump_is_delivered_once() {
        let mut input = InputState::new();
        assert!(!input.take_jump());
        input.press(Action::Jump);
        input.release(Action::Jump);
        assert!(input.take_jump());
        assert!(!input.take_jump());
    }

    #[test]
    fn edge_actions_report_themselves() {
        let mut input = InputState::new();
        assert!(input.press(Action::Fire));
        assert!(input.press(Action::Unlock));
        assert!(!input.press(Action::MoveRight));
        assert_eq!(
            input.intent(),
            MoveIntent {
                right: true,
                ..MoveIntent::default()
            }
        );
    }

    #[test]
    fn clear_drops_everything() {
        let mut input = InputState::new();
        input.press(Action::MoveBackward);
        input.press(Action::Jump);
        input.clear();
        assert_eq!(input.intent(), MoveIntent::default());
        assert!(!input.take_jump());
    }
}
