use crate::ScoreSink;
use std::sync::{Arc, Mutex};

/// Keeps submitted scores in memory. Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    scores: Arc<Mutex<Vec<u32>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn submitted(&self) -> Vec<u32> {
        self.scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl ScoreSink for RecordingSink {
    fn submit(&self, score: u32) {
        tracing::info!("recorded score {score} (offline)");
        self.scores
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(score);
    }
}
