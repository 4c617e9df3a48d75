//! File-backed leaderboard.
//!
//! The file is a bare JSON array of integers, e.g. `[120, 90, 40]`, so it
//! stays compatible with existing `scores.json` files.

use std::path::{Path, PathBuf};

/// Scores kept on the board.
pub const MAX_ENTRIES: usize = 10;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("score file {path} is not a JSON array of scores: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-ten leaderboard stored at a single path.
#[derive(Debug, Clone)]
pub struct ScoreBoard {
    path: PathBuf,
}

impl ScoreBoard {
    /// Refer to a board file. Nothing is read or created until used.
    pub fn open(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current scores, highest first. A missing file is an empty board.
    pub fn load(&self) -> Result<Vec<u32>, StoreError> {
        let bytes = match std::fs::read(&self.path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_slice(&bytes).map_err(|source| StoreError::Corrupt {
            path: self.path.clone(),
            source,
        })
    }

    /// Add a score, keep the best [`MAX_ENTRIES`], persist, and return the
    /// new board.
    pub fn record(&self, score: u32) -> Result<Vec<u32>, StoreError> {
        let mut scores = self.load()?;
        scores.push(score);
        scores.sort_unstable_by(|a, b| b.cmp(a));
        scores.truncate(MAX_ENTRIES);
        self.save(&scores)?;
        tracing::debug!("recorded score {score}; board now {scores:?}");
        Ok(scores)
    }

    fn save(&self, scores: &[u32]) -> Result<(), StoreError> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec(scores)?)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_board() {
        let tmp = tempfile::tempdir().unwrap();
        let board = ScoreBoard::open(tmp.path().join("scores.json"));
        assert!(board.load().unwrap().is_empty());
        assert!(!board.path().exists());
    }

    #[test]
    fn record_sorts_descending() {
        let tmp = tempfile::tempdir().unwrap();
        let board = ScoreBoard::open(tmp.path().join("scores.json"));
        board.record(30).unwrap();
        board.record(120).unwrap();
        let scores = board.record(0).unwrap();
        assert_eq!(scores, vec![120, 30, 0]);
        assert_eq!(board.load().unwrap(), scores);
    }

    #[test]
    fn keeps_only_top_ten() {
        let tmp = tempfile::tempdir().unwrap();
        let board = ScoreBoard::open(tmp.path().join("scores.json"));
        for s in (0..15).map(|i| i * 10) {
            board.record(s).unwrap();
        }
        let scores = board.load().unwrap();
        assert_eq!(scores.len(), MAX_ENTRIES);
        assert_eq!(scores[0], 140);
        assert_eq!(*scores.last().unwrap(), 50);

        // A score below the cut does not displace anyone.
        assert_eq!(board.record(10).unwrap(), scores);
    }

    #[test]
    fn file_is_bare_json_array() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scores.json");
        let board = ScoreBoard::open(&path);
        board.record(40).unwrap();
        board.record(70).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[70,40]");
    }

    #[test]
    fn creates_parent_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let board = ScoreBoard::open(tmp.path().join("data").join("scores.json"));
        board.record(10).unwrap();
        assert_eq!(board.load().unwrap(), vec![10]);
    }

    #[test]
    fn corrupt_file_is_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("scores.json");
        std::fs::write(&path, "{\"not\": \"a list\"}").unwrap();
        let board = ScoreBoard::open(&path);
        assert!(matches!(board.load(), Err(StoreError::Corrupt { .. })));
        assert!(board.record(10).is_err());
    }
}
