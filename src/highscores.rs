//! High score leaderboard
//!
//! Keeps the top 10 scores locally and defines the wire types exchanged with
//! the remote leaderboard service (`POST /scores/`, `GET /scores/top/`).

use serde::{Deserialize, Serialize};

use crate::error::SubmissionError;

/// Maximum number of high scores to keep
pub const MAX_HIGH_SCORES: usize = 10;

/// Number of letters in a player's initials
pub const INITIALS_LEN: usize = 3;

/// A single high score entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighScoreEntry {
    pub initials: String,
    pub score: u64,
    /// Unix timestamp (ms) when achieved
    pub timestamp: f64,
}

/// Score payload sent to the leaderboard service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSubmission {
    pub initials: String,
    pub score: u64,
}

impl ScoreSubmission {
    /// Validate and normalize a submission (initials are upper-cased)
    pub fn new(initials: &str, score: u64) -> Result<Self, SubmissionError> {
        let initials = initials.trim().to_ascii_uppercase();
        let valid = initials.len() == INITIALS_LEN
            && initials.bytes().all(|b| b.is_ascii_uppercase());
        if !valid {
            return Err(SubmissionError::InvalidInitials(initials));
        }
        Ok(Self { initials, score })
    }

    /// Request body for `POST /scores/`
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// Response envelope of the leaderboard service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: for<'de> Deserialize<'de>> ApiResponse<T> {
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// High score leaderboard
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct HighScores {
    pub entries: Vec<HighScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Check if a score qualifies for the leaderboard
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.entries.len() < MAX_HIGH_SCORES {
            return true;
        }
        self.entries.last().map(|e| score >= e.score).unwrap_or(true)
    }

    /// Add a score; returns the rank achieved (1-indexed) or None if it didn't qualify.
    ///
    /// Ordering is score descending, then newest first, so a tie with an
    /// existing entry ranks above it.
    pub fn add_score(&mut self, submission: ScoreSubmission, timestamp: f64) -> Option<usize> {
        if !self.qualifies(submission.score) {
            return None;
        }

        let entry = HighScoreEntry {
            initials: submission.initials,
            score: submission.score,
            timestamp,
        };

        let pos = self
            .entries
            .iter()
            .position(|e| (entry.score, entry.timestamp) > (e.score, e.timestamp))
            .unwrap_or(self.entries.len());
        self.entries.insert(pos, entry);
        self.entries.truncate(MAX_HIGH_SCORES);

        if pos < MAX_HIGH_SCORES {
            log::info!("New high score at rank {}", pos + 1);
            Some(pos + 1)
        } else {
            None
        }
    }

    /// Replace local entries with the service's top list
    pub fn replace_with(&mut self, mut entries: Vec<HighScoreEntry>) {
        entries.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then(b.timestamp.total_cmp(&a.timestamp))
        });
        entries.truncate(MAX_HIGH_SCORES);
        self.entries = entries;
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn top_score(&self) -> Option<u64> {
        self.entries.first().map(|e| e.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submit(initials: &str, score: u64) -> ScoreSubmission {
        ScoreSubmission::new(initials, score).unwrap()
    }

    #[test]
    fn test_initials_validation() {
        assert_eq!(submit("abc", 10).initials, "ABC");
        assert!(matches!(
            ScoreSubmission::new("AB", 10),
            Err(SubmissionError::InvalidInitials(_))
        ));
        assert!(ScoreSubmission::new("AB1", 10).is_err());
        assert!(ScoreSubmission::new("ABCD", 10).is_err());
        assert!(ScoreSubmission::new("ÄBC", 10).is_err());
    }

    #[test]
    fn test_submission_body() {
        let body = submit("xyz", 85).to_json().unwrap();
        assert_eq!(body, r#"{"initials":"XYZ","score":85}"#);
    }

    #[test]
    fn test_parse_leaderboard_response() {
        let json = r#"{
            "success": true,
            "message": "Leaderboard retrieved successfully",
            "data": [
                {"initials": "AAA", "score": 120, "timestamp": 2.0},
                {"initials": "BBB", "score": 300, "timestamp": 1.0}
            ]
        }"#;
        let response = ApiResponse::<Vec<HighScoreEntry>>::from_json(json).unwrap();
        assert!(response.success);

        let mut scores = HighScores::new();
        scores.replace_with(response.data.unwrap());
        assert_eq!(scores.top_score(), Some(300));
        assert_eq!(scores.entries[1].initials, "AAA");

        let failed = r#"{"success": false, "message": "bad", "data": null}"#;
        let response = ApiResponse::<HighScoreEntry>::from_json(failed).unwrap();
        assert!(!response.success);
        assert!(response.data.is_none());
    }

    #[test]
    fn test_ranking_and_ties() {
        let mut scores = HighScores::new();
        assert_eq!(scores.add_score(submit("AAA", 50), 1.0), Some(1));
        assert_eq!(scores.add_score(submit("BBB", 80), 2.0), Some(1));
        // Same score, newer entry ranks first
        assert_eq!(scores.add_score(submit("CCC", 50), 3.0), Some(2));
        assert_eq!(scores.entries[2].initials, "AAA");
        assert_eq!(scores.add_score(submit("DDD", 0), 4.0), None);
    }

    #[test]
    fn test_leaderboard_caps_at_ten() {
        let mut scores = HighScores::new();
        for i in 0..MAX_HIGH_SCORES as u64 {
            scores.add_score(submit("AAA", 100 + i), i as f64);
        }
        assert!(!scores.qualifies(50));
        assert_eq!(scores.add_score(submit("ZZZ", 50), 99.0), None);
        assert_eq!(scores.add_score(submit("ZZZ", 500), 99.0), Some(1));
        assert_eq!(scores.entries.len(), MAX_HIGH_SCORES);
        assert_eq!(scores.entries.last().map(|e| e.score), Some(101));
    }
}
