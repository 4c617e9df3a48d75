//! Score reporting at round end.
//!
//! # Invariants
//! - Submission never blocks the caller and never reports back.
//! - One call to [`ScoreSink::submit`] issues at most one request; there is
//!   no retry.

mod http;
mod recording;

pub use http::{HttpScoreReporter, ReportError};
pub use recording::RecordingSink;

/// Where a finished round's score goes.
///
/// The contract is fire-and-forget: implementations must return promptly
/// and swallow their own failures. Callers cannot tell whether the score
/// arrived.
pub trait ScoreSink {
    fn submit(&self, score: u32);
}

impl<T: ScoreSink + ?Sized> ScoreSink for Box<T> {
    fn submit(&self, score: u32) {
        (**self).submit(score);
    }
}
