use serde::{Deserialize, Serialize};

/// Where the round is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// View not locked. Countdown frozen.
    Inactive,
    /// View locked and countdown running.
    Active,
    /// Countdown hit zero; waiting for the round-end sequence to finish.
    Ended,
}

/// What a lock request did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockChange {
    Started,
    Resumed,
    Unchanged,
    Refused,
}

/// Countdown state machine: Inactive -> Active -> Ended -> (reset) -> Inactive.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundTimer {
    initial: u32,
    time_left: u32,
    phase: RoundPhase,
    started: bool,
}

impl RoundTimer {
    pub fn new(seconds: u32) -> Self {
        Self {
            initial: seconds,
            time_left: seconds,
            phase: RoundPhase::Inactive,
            started: false,
        }
    }

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    /// Whether this round has been entered at least once since the last reset.
    pub fn started(&self) -> bool {
        self.started
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        self.phase == RoundPhase::Active
    }

    /// View lock acquired.
    pub fn acquire(&mut self) -> LockChange {
        match self.phase {
            RoundPhase::Active => LockChange::Unchanged,
            RoundPhase::Ended => LockChange::Refused,
            RoundPhase::Inactive => {
                self.phase = RoundPhase::Active;
                if self.started {
                    LockChange::Resumed
                } else {
                    self.started = true;
                    LockChange::Started
                }
            }
        }
    }

    /// View lock lost. Progress is kept. Returns whether a running round paused.
    pub fn release(&mut self) -> bool {
        if self.phase == RoundPhase::Active {
            self.phase = RoundPhase::Inactive;
            true
        } else {
            false
        }
    }

    /// One wall-clock second elapsed. Returns `true` exactly once per round,
    /// on the tick that reaches zero.
    pub fn tick(&mut self) -> bool {
        if self.phase != RoundPhase::Active || self.time_left == 0 {
            return false;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.phase = RoundPhase::Ended;
            return true;
        }
        false
    }

    /// Restore the full countdown after a round ended. No-op in other phases.
    pub fn reset(&mut self) -> bool {
        if self.phase != RoundPhase::Ended {
            return false;
        }
        self.time_left = self.initial;
        self.phase = RoundPhase::Inactive;
        self.started = false;
        true
    }
}
