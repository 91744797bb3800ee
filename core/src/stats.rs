//! Read-only views derived from a [`Ladder`].

use crate::{
    history::{MatchHistory, MatchRecord},
    ladder::Ladder,
    rating::Rating,
    team::PlayerId,
};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A player's position on the ladder.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Standing {
    /// 1-based position.
    pub rank: usize,
    pub player: PlayerId,
    pub rating: Rating,
    pub matches: u32,
    pub wins: u32,
    /// Percentage of matches won, 0 if the player has not played.
    pub win_rate: f64,
    /// Sum of all rating changes.
    pub net_change: Rating,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct RatedPlayer {
    pub player: PlayerId,
    pub rating: Rating,
}

/// How many matches were played with a given number of players per side.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct TeamSizeCount {
    /// Players on the smaller and the larger side.
    pub sizes: (usize, usize),
    pub matches: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Summary {
    pub total_matches: usize,
    pub active_players: usize,
    pub highest_rated: Option<RatedPlayer>,
    pub team_sizes: Vec<TeamSizeCount>,
}

#[derive(Clone, Copy, Debug, Default)]
struct Tally {
    matches: u32,
    wins: u32,
    net_change: Rating,
}

impl Tally {
    fn win_rate(&self) -> f64 {
        if self.matches == 0 {
            0.0
        } else {
            f64::from(self.wins) / f64::from(self.matches) * 100.0
        }
    }
}

fn tallies(history: &MatchHistory) -> HashMap<&str, Tally> {
    let mut tallies = HashMap::<&str, Tally>::new();
    for record in history.all() {
        for p in &record.participants {
            let tally = tallies.entry(p.player.as_str()).or_default();
            tally.matches += 1;
            tally.wins += u32::from(record.won(p));
            tally.net_change = tally.net_change.saturating_add(p.change());
        }
    }
    tallies
}

fn standing(rank: usize, player: PlayerId, rating: Rating, tally: Tally) -> Standing {
    Standing {
        rank,
        player,
        rating,
        matches: tally.matches,
        wins: tally.wins,
        win_rate: tally.win_rate(),
        net_change: tally.net_change,
    }
}

/// The full ladder, best first.
pub fn standings(ladder: &Ladder) -> Vec<Standing> {
    let tallies = tallies(ladder.history());
    ladder
        .store()
        .snapshot()
        .into_iter()
        .enumerate()
        .map(|(i, (player, rating))| {
            let tally = tallies.get(player.as_str()).copied().unwrap_or_default();
            standing(i + 1, player, rating, tally)
        })
        .collect()
}

/// One player's line of the ladder, or `None` if they have never played.
pub fn player_stats(ladder: &Ladder, player: &str) -> Option<Standing> {
    let player = PlayerId::parse(player)?;
    standings(ladder)
        .into_iter()
        .find(|standing| standing.player == player)
}

pub fn summary(ladder: &Ladder) -> Summary {
    let team_sizes = ladder
        .history()
        .all()
        .iter()
        .map(|record| {
            let (a, b) = record.team_sizes();
            (a.min(b), a.max(b))
        })
        .counts()
        .into_iter()
        .sorted()
        .map(|(sizes, matches)| TeamSizeCount { sizes, matches })
        .collect();

    Summary {
        total_matches: ladder.history().len(),
        active_players: ladder.store().len(),
        highest_rated: export_rows(ladder).into_iter().next(),
        team_sizes,
    }
}

/// The last `n` matches, most recent first.
pub fn recent_matches(ladder: &Ladder, n: usize) -> Vec<&MatchRecord> {
    ladder.history().recent(n).iter().rev().collect()
}

/// Every player and their current rating, best first.
pub fn export_rows(ladder: &Ladder) -> Vec<RatedPlayer> {
    ladder
        .store()
        .snapshot()
        .into_iter()
        .map(|(player, rating)| RatedPlayer { player, rating })
        .collect()
}
