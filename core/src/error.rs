use crate::team::{PlayerId, Side};
use thiserror::Error;

/// Why a match could not be rated.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum MatchError {
    #[error("{side} has no players")]
    EmptyTeam { side: Side },

    #[error("invalid winner {token:?}, expected Team_A or Team_B")]
    InvalidWinner { token: String },

    #[error("invalid result {token:?}, expected 1 or 2")]
    InvalidResult { token: String },

    #[error("{player} cannot play on both sides of a match")]
    PlayerOnBothSides { player: PlayerId },

    /// An empty team reached the rating math.
    ///
    /// Teams are validated before they are rated, so this indicates a bug in the caller rather than
    /// bad input.
    #[error("cannot compute the rating of a team with no players")]
    InvalidTeam,
}

/// Why a ladder configuration was refused.
#[derive(Clone, Copy, Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("K-factor must be a finite positive number, got {k_factor}")]
    InvalidKFactor { k_factor: f64 },
}

impl MatchError {
    /// Whether the error is confined to the submitted match.
    ///
    /// Row errors are skipped during batch processing; anything else aborts the batch.
    pub fn is_row_error(&self) -> bool {
        !matches!(self, Self::InvalidTeam)
    }
}
