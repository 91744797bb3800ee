use crate::error::MatchError;
use derive_more::{Display, Into};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::{borrow::Borrow, ops::Not};

/// A player's name, trimmed of surrounding whitespace.
///
/// Names are case-sensitive: `alice` and `Alice` are different players.
#[derive(
    Clone, Debug, Display, Into, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize, Serialize,
)]
#[display("{_0}")]
#[serde(transparent)]
pub struct PlayerId(String);

impl PlayerId {
    /// Normalize a raw name, or `None` if nothing is left after trimming.
    pub fn parse(raw: &str) -> Option<Self> {
        let name = raw.trim();
        (!name.is_empty()).then(|| Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for PlayerId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

/// One side of a match.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub enum Side {
    #[display("Team A")]
    #[serde(rename = "Team_A")]
    TeamA,
    #[display("Team B")]
    #[serde(rename = "Team_B")]
    TeamB,
}

impl Side {
    /// Parse a winner token (`Team_A` or `Team_B`, case-sensitive).
    pub fn from_token(token: &str) -> Result<Self, MatchError> {
        match token.trim() {
            "Team_A" => Ok(Self::TeamA),
            "Team_B" => Ok(Self::TeamB),
            _ => Err(MatchError::InvalidWinner {
                token: token.to_string(),
            }),
        }
    }
}

impl Not for Side {
    type Output = Self;

    fn not(self) -> Self {
        match self {
            Self::TeamA => Self::TeamB,
            Self::TeamB => Self::TeamA,
        }
    }
}

/// The outcome of a one-on-one match.
#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PairResult {
    #[display("player 1 wins")]
    Player1Wins,
    #[display("player 2 wins")]
    Player2Wins,
}

impl PairResult {
    /// Parse a result token (`1` or `2`).
    pub fn from_token(token: &str) -> Result<Self, MatchError> {
        match token.trim() {
            "1" => Ok(Self::Player1Wins),
            "2" => Ok(Self::Player2Wins),
            _ => Err(MatchError::InvalidResult {
                token: token.to_string(),
            }),
        }
    }

    /// Player 1's actual score.
    pub fn score(self) -> f64 {
        match self {
            Self::Player1Wins => 1.0,
            Self::Player2Wins => 0.0,
        }
    }

    /// The winning side, with player 1 playing as team A.
    pub fn winner(self) -> Side {
        match self {
            Self::Player1Wins => Side::TeamA,
            Self::Player2Wins => Side::TeamB,
        }
    }
}

/// The players on one side of a single match.
///
/// Teams are not standing entities; one is assembled for each match from a comma-separated list of
/// names. A team is never empty and never lists the same player twice.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Team(Vec<PlayerId>);

impl Team {
    /// Parse a comma-separated list of names.
    ///
    /// Each name is trimmed and empty entries are dropped. Repeated names are kept once, at their
    /// first position.
    pub fn parse(raw: &str, side: Side) -> Result<Self, MatchError> {
        let players = raw
            .split(',')
            .filter_map(PlayerId::parse)
            .unique()
            .collect::<Vec<_>>();
        if players.is_empty() {
            return Err(MatchError::EmptyTeam { side });
        }
        Ok(Self(players))
    }

    /// A team of exactly one player. The name is not split on commas.
    pub fn solo(raw: &str, side: Side) -> Result<Self, MatchError> {
        let player = PlayerId::parse(raw).ok_or(MatchError::EmptyTeam { side })?;
        Ok(Self(vec![player]))
    }

    pub fn players(&self) -> &[PlayerId] {
        &self.0
    }

    pub fn contains(&self, player: &PlayerId) -> bool {
        self.0.contains(player)
    }

    /// The first of our players who is also on `other`, if any.
    pub fn overlap<'a>(&'a self, other: &Team) -> Option<&'a PlayerId> {
        self.0.iter().find(|player| other.contains(player))
    }
}

impl std::fmt::Display for Team {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(team: &Team) -> Vec<&str> {
        team.players().iter().map(PlayerId::as_str).collect()
    }

    #[test]
    fn player_names_are_trimmed() {
        assert_eq!(PlayerId::parse("  Alice \t").unwrap().as_str(), "Alice");
        assert_eq!(PlayerId::parse("   "), None);
        assert_ne!(PlayerId::parse("alice"), PlayerId::parse("Alice"));
    }

    #[test]
    fn parse_team_string() {
        let team = Team::parse("Alice, Bob ,Charlie", Side::TeamA).unwrap();
        assert_eq!(names(&team), ["Alice", "Bob", "Charlie"]);
        assert_eq!(team.to_string(), "Alice, Bob, Charlie");
    }

    #[test]
    fn empty_segments_are_dropped() {
        let team = Team::parse(",, Alice,,  , Bob,", Side::TeamB).unwrap();
        assert_eq!(names(&team), ["Alice", "Bob"]);
    }

    #[test]
    fn empty_team_is_rejected() {
        for raw in ["", "   ", ", ,,"] {
            assert_eq!(
                Team::parse(raw, Side::TeamB),
                Err(MatchError::EmptyTeam { side: Side::TeamB })
            );
        }
        assert_eq!(
            Team::solo(" ", Side::TeamA),
            Err(MatchError::EmptyTeam { side: Side::TeamA })
        );
    }

    #[test]
    fn repeated_names_count_once() {
        let team = Team::parse("Bob, Alice, Bob", Side::TeamA).unwrap();
        assert_eq!(names(&team), ["Bob", "Alice"]);
    }

    #[test]
    fn solo_keeps_commas() {
        let team = Team::solo(" Smith, J ", Side::TeamA).unwrap();
        assert_eq!(names(&team), ["Smith, J"]);
    }

    #[test]
    fn overlap() {
        let a = Team::parse("Alice, Bob", Side::TeamA).unwrap();
        let b = Team::parse("Carol, Bob", Side::TeamB).unwrap();
        let c = Team::parse("Dave", Side::TeamB).unwrap();
        assert_eq!(a.overlap(&b).map(PlayerId::as_str), Some("Bob"));
        assert_eq!(a.overlap(&c), None);
    }

    #[test]
    fn winner_tokens() {
        assert_eq!(Side::from_token("Team_A"), Ok(Side::TeamA));
        assert_eq!(Side::from_token(" Team_B "), Ok(Side::TeamB));
        for token in ["team_a", "Team_C", "A", ""] {
            assert_eq!(
                Side::from_token(token),
                Err(MatchError::InvalidWinner {
                    token: token.to_string()
                })
            );
        }
        assert_eq!(!Side::TeamA, Side::TeamB);
    }

    #[test]
    fn result_tokens() {
        assert_eq!(PairResult::from_token("1"), Ok(PairResult::Player1Wins));
        assert_eq!(PairResult::from_token("2"), Ok(PairResult::Player2Wins));
        for token in ["0", "3", "1.0", "draw"] {
            assert!(matches!(
                PairResult::from_token(token),
                Err(MatchError::InvalidResult { .. })
            ));
        }
        assert_eq!(PairResult::Player2Wins.winner(), Side::TeamB);
        assert_eq!(PairResult::Player2Wins.score(), 0.0);
    }
}
