use crate::{
    history::MatchRecord,
    ladder::SkippedRow,
    stats::{Standing, Summary},
};
use derive_more::From;
use serde::{Deserialize, Serialize};

/// A team match as submitted, before the winner token is checked.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamMatch {
    /// Comma-separated player names.
    pub team_a: String,
    /// Comma-separated player names.
    pub team_b: String,
    /// `Team_A` or `Team_B`.
    pub winner: String,
}

/// A one-on-one match as submitted, before the result token is checked.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct PairMatch {
    pub player1: String,
    pub player2: String,
    /// `1` if player 1 won, `2` if player 2 won.
    pub result: String,
}

#[derive(Clone, Debug, From, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum MatchRequest {
    Team(TeamMatch),
    Pair(PairMatch),
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    /// Rate a team match.
    Team(TeamMatch),
    /// Rate a one-on-one match.
    Pair(PairMatch),
    /// Rate several matches in order, skipping invalid ones.
    Batch { matches: Vec<MatchRequest> },
    /// Forget every player and every match.
    Reset,
    /// The full ladder.
    Standings,
    /// One player's ladder line.
    Player { name: String },
    /// Totals across the ladder.
    Summary,
    /// The most recent matches, newest first.
    Recent { count: usize },
}

#[derive(Clone, Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Report {
    /// A match was rated.
    Recorded {
        record: MatchRecord,
        standings: Vec<Standing>,
    },

    /// A batch was processed.
    Batch {
        applied: Vec<MatchRecord>,
        skipped: Vec<SkippedRow>,
        standings: Vec<Standing>,
    },

    /// The ladder was cleared.
    Reset { standings: Vec<Standing> },

    /// Response to `standings`
    Standings { standings: Vec<Standing> },

    /// Response to `player`
    Player { standing: Standing },

    /// Response to `summary`
    Summary { summary: Summary },

    /// Response to `recent`
    Recent { matches: Vec<MatchRecord> },

    /// The request was not applied.
    Rejected { reason: String },
}
