use crate::{
    rating::{Rating, STARTING_RATING},
    team::PlayerId,
};
use itertools::Itertools;
use std::collections::HashMap;

/// Current rating of every player seen so far.
///
/// Players are added the first time a match references them and are only removed when the whole
/// store is reset. The store remembers the order in which players first appeared, which breaks
/// ties on the leaderboard.
#[derive(Clone, Debug)]
pub struct RatingStore {
    starting_rating: Rating,
    index: HashMap<PlayerId, usize>,
    entries: Vec<(PlayerId, Rating)>,
}

impl Default for RatingStore {
    fn default() -> Self {
        Self::new(STARTING_RATING)
    }
}

impl RatingStore {
    pub fn new(starting_rating: Rating) -> Self {
        Self {
            starting_rating,
            index: Default::default(),
            entries: Default::default(),
        }
    }

    /// The player's current rating, if they have played.
    pub fn get(&self, player: &str) -> Option<Rating> {
        self.index.get(player).map(|&i| self.entries[i].1)
    }

    /// The player's current rating, registering them at the starting rating if they are new.
    pub fn get_or_init(&mut self, player: &PlayerId) -> Rating {
        if let Some(rating) = self.get(player.as_str()) {
            return rating;
        }
        tracing::debug!(%player, rating = self.starting_rating, "new player");
        self.insert(player.clone(), self.starting_rating);
        self.starting_rating
    }

    /// Overwrite the player's rating.
    ///
    /// There is no range check; ratings may become arbitrarily low or high.
    pub fn set(&mut self, player: &PlayerId, rating: Rating) {
        match self.index.get(player.as_str()) {
            Some(&i) => self.entries[i].1 = rating,
            None => self.insert(player.clone(), rating),
        }
    }

    /// All players, best first.
    ///
    /// Players with equal ratings keep the order in which they first appeared.
    pub fn snapshot(&self) -> Vec<(PlayerId, Rating)> {
        self.entries
            .iter()
            .cloned()
            .sorted_by(|(_, a), (_, b)| b.cmp(a))
            .collect()
    }

    /// All players in the order they first appeared.
    pub fn iter(&self) -> impl '_ + Iterator<Item = (&PlayerId, Rating)> {
        self.entries.iter().map(|(player, rating)| (player, *rating))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub(crate) fn reset(&mut self) {
        self.index.clear();
        self.entries.clear();
    }

    fn insert(&mut self, player: PlayerId, rating: Rating) {
        self.index.insert(player.clone(), self.entries.len());
        self.entries.push((player, rating));
    }
}
