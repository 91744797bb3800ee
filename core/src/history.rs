use crate::{
    rating::Rating,
    team::{PlayerId, Side},
};
use derive_more::Display;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Display, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchKind {
    /// Teams of any size, rated by their average.
    #[display("team")]
    Team,
    /// One player against another.
    #[display("pair")]
    Pair,
}

/// How one player's rating moved in a match.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Participant {
    pub player: PlayerId,
    pub side: Side,
    pub before: Rating,
    pub after: Rating,
}

impl Participant {
    pub fn change(&self) -> Rating {
        self.after.saturating_sub(self.before)
    }
}

/// A rated match.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MatchRecord {
    pub kind: MatchKind,
    /// Team A as submitted (the player's name in a pair match).
    pub team_a: String,
    /// Team B as submitted (the player's name in a pair match).
    pub team_b: String,
    pub winner: Side,
    /// Every player in the match, team A first, in the order they were listed.
    pub participants: Vec<Participant>,
}

impl MatchRecord {
    /// The participants playing on `side`.
    pub fn side(&self, side: Side) -> impl '_ + Iterator<Item = &Participant> {
        self.participants.iter().filter(move |p| p.side == side)
    }

    /// The rating change of the first player listed on `side`.
    ///
    /// In a team match every member of a side moves by the same amount. In a pair match the two
    /// changes are rounded separately and need not mirror each other.
    pub fn change(&self, side: Side) -> Rating {
        self.side(side).next().map(Participant::change).unwrap_or_default()
    }

    pub fn participant(&self, player: &str) -> Option<&Participant> {
        self.participants
            .iter()
            .find(|p| p.player.as_str() == player)
    }

    pub fn won(&self, participant: &Participant) -> bool {
        participant.side == self.winner
    }

    /// Number of players on team A and team B.
    pub fn team_sizes(&self) -> (usize, usize) {
        (
            self.side(Side::TeamA).count(),
            self.side(Side::TeamB).count(),
        )
    }
}

/// Every match rated so far, oldest first.
#[derive(Clone, Debug, Default)]
pub struct MatchHistory {
    records: Vec<MatchRecord>,
}

impl MatchHistory {
    pub fn append(&mut self, record: MatchRecord) {
        self.records.push(record);
    }

    pub fn all(&self) -> &[MatchRecord] {
        &self.records
    }

    /// The last `n` matches, oldest first.
    pub fn recent(&self, n: usize) -> &[MatchRecord] {
        &self.records[self.records.len().saturating_sub(n)..]
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        self.records.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn participant(name: &str, side: Side, before: Rating, after: Rating) -> Participant {
        Participant {
            player: PlayerId::parse(name).unwrap(),
            side,
            before,
            after,
        }
    }

    fn record(team_a: &str, team_b: &str) -> MatchRecord {
        MatchRecord {
            kind: MatchKind::Pair,
            team_a: team_a.into(),
            team_b: team_b.into(),
            winner: Side::TeamA,
            participants: vec![
                participant(team_a, Side::TeamA, 1400, 1416),
                participant(team_b, Side::TeamB, 1400, 1384),
            ],
        }
    }

    #[test]
    fn recent_is_chronological_tail() {
        let mut history = MatchHistory::default();
        for (a, b) in [("A", "B"), ("C", "D"), ("E", "F")] {
            history.append(record(a, b));
        }
        let teams = |records: &[MatchRecord]| {
            records
                .iter()
                .map(|r| r.team_a.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(teams(history.recent(2)), ["C", "E"]);
        assert_eq!(teams(history.recent(10)), ["A", "C", "E"]);
        assert!(history.recent(0).is_empty());
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn reset_empties_history() {
        let mut history = MatchHistory::default();
        history.append(record("A", "B"));
        history.reset();
        assert!(history.is_empty());
        assert!(history.recent(5).is_empty());
    }

    #[test]
    fn record_accessors() {
        let record = MatchRecord {
            kind: MatchKind::Team,
            team_a: "Alice, Bob".into(),
            team_b: "Carol".into(),
            winner: Side::TeamB,
            participants: vec![
                participant("Alice", Side::TeamA, 1400, 1384),
                participant("Bob", Side::TeamA, 1500, 1484),
                participant("Carol", Side::TeamB, 1450, 1466),
            ],
        };
        assert_eq!(record.change(Side::TeamA), -16);
        assert_eq!(record.change(Side::TeamB), 16);
        assert_eq!(record.team_sizes(), (2, 1));
        let carol = record.participant("Carol").unwrap();
        assert!(record.won(carol));
        assert!(!record.won(record.participant("Bob").unwrap()));
        assert_eq!(record.participant("Dave"), None);
    }
}
