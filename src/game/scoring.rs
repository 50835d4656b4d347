//! Match scoring and tie-break policy.
//!
//! A match is decided only once `ROUNDS_THRESHOLD` rounds have been played.
//! From then on, equal scores extend the match by one round at a time and any
//! difference ends it. This is not "first to N wins": a 1-0 lead after three
//! rounds with one draw still ends the match.

use crate::config::game::{PLAYERS_PER_MATCH, ROUNDS_THRESHOLD};
use crate::game::types::PlayerIndex;

/// Classification of a match after a round has been recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchProgress {
    Continue,
    Tiebreak,
    Complete,
}

#[derive(Debug, Clone)]
pub struct Match {
    names: [String; PLAYERS_PER_MATCH],
    scores: [u32; PLAYERS_PER_MATCH],
    rounds_played: u32,
    threshold: u32,
}

impl Match {
    pub fn new(names: [String; PLAYERS_PER_MATCH]) -> Self {
        Self::with_threshold(names, ROUNDS_THRESHOLD)
    }

    pub fn with_threshold(names: [String; PLAYERS_PER_MATCH], threshold: u32) -> Self {
        Self {
            names,
            scores: [0; PLAYERS_PER_MATCH],
            rounds_played: 0,
            threshold,
        }
    }

    pub fn names(&self) -> &[String; PLAYERS_PER_MATCH] {
        &self.names
    }

    pub fn scores(&self) -> [u32; PLAYERS_PER_MATCH] {
        self.scores
    }

    pub fn rounds_played(&self) -> u32 {
        self.rounds_played
    }

    /// Record a finished round (`None` for a full board) and classify the match.
    pub fn record_round(&mut self, winner: Option<PlayerIndex>) -> MatchProgress {
        if let Some(player) = winner {
            self.scores[player] += 1;
        }
        self.rounds_played += 1;
        self.progress()
    }

    pub fn progress(&self) -> MatchProgress {
        if self.rounds_played < self.threshold {
            return MatchProgress::Continue;
        }
        let [a, b] = self.scores;
        if a == b {
            MatchProgress::Tiebreak
        } else {
            // Both a lead of 2+ and a lead of exactly 1 end the match.
            MatchProgress::Complete
        }
    }

    /// Player with the strictly higher score, `None` on a tie.
    pub fn winner(&self) -> Option<PlayerIndex> {
        let [a, b] = self.scores;
        match a.cmp(&b) {
            std::cmp::Ordering::Greater => Some(0),
            std::cmp::Ordering::Less => Some(1),
            std::cmp::Ordering::Equal => None,
        }
    }

    pub fn winner_name(&self) -> Option<&str> {
        self.winner().map(|i| self.names[i].as_str())
    }
}
