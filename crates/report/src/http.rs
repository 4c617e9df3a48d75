use crate::ScoreSink;
use gallery_common::ScoreSubmission;
use std::time::Duration;

const SUBMIT_PATH: &str = "/save_score";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Failures of a single submission. Never surfaced past the reporter thread.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to encode score: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("server answered {0}")]
    Status(u16),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Posts scores to `{base_url}/save_score` from a detached thread.
///
/// The thread is not joined and cannot be cancelled. Its result is logged
/// and dropped.
#[derive(Clone)]
pub struct HttpScoreReporter {
    endpoint: String,
    agent: ureq::Agent,
}

impl HttpScoreReporter {
    pub fn new(base_url: &str) -> Self {
        let endpoint = format!("{}{SUBMIT_PATH}", base_url.trim_end_matches('/'));
        let agent = ureq::AgentBuilder::new().timeout(REQUEST_TIMEOUT).build();
        Self { endpoint, agent }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Issue the request on the current thread. The response body is not read.
    pub fn send(&self, score: u32) -> Result<(), ReportError> {
        let body = serde_json::to_string(&ScoreSubmission { score })?;
        match self
            .agent
            .post(&self.endpoint)
            .set("Content-Type", "application/json")
            .send_string(&body)
        {
            Ok(_) => Ok(()),
            Err(ureq::Error::Status(code, _)) => Err(ReportError::Status(code)),
            Err(ureq::Error::Transport(t)) => Err(ReportError::Transport(t.to_string())),
        }
    }
}

impl ScoreSink for HttpScoreReporter {
    fn submit(&self, score: u32) {
        let reporter = self.clone();
        let spawned = std::thread::Builder::new()
            .name("score-report".into())
            .spawn(move || match reporter.send(score) {
                Ok(()) => tracing::debug!("score {score} sent to {}", reporter.endpoint),
                Err(e) => tracing::warn!("score {score} not delivered: {e}"),
            });
        if let Err(e) = spawned {
            tracing::warn!("could not start score reporter thread: {e}");
        }
    }
}
