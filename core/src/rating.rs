use crate::error::MatchError;

/// A player's rating, as stored between matches.
///
/// Updates are computed in floating point and rounded to the nearest integer (ties away from zero)
/// before they are stored.
pub type Rating = i64;

/// The rating a player starts with the first time they appear in a match.
pub const STARTING_RATING: Rating = 1400;

/// The K-factor instantiating the Elo rating system.
///
/// K bounds how far a single result can move a rating: a player who was certain to lose and wins
/// anyway gains (almost) K points. Lower values make the ladder slower to react.
pub const K_FACTOR: f64 = 32.0;

/// Rating difference at which the stronger side is expected to win ten times as often.
const SCALE: f64 = 400.0;

/// The probability that a side rated `rating_a` beats a side rated `rating_b`.
pub fn expected_score(rating_a: f64, rating_b: f64) -> f64 {
    1.0 / (1.0 + 10f64.powf((rating_b - rating_a) / SCALE))
}

/// The effective rating of a team: the mean of its members' ratings.
pub fn team_rating(members: &[Rating]) -> Result<f64, MatchError> {
    if members.is_empty() {
        return Err(MatchError::InvalidTeam);
    }
    Ok(members.iter().map(|&r| r as f64).sum::<f64>() / members.len() as f64)
}

/// New ratings for both sides of a team match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TeamUpdate {
    /// New ratings of team A, aligned with the ratings passed in.
    pub team_a: Vec<Rating>,
    /// New ratings of team B, aligned with the ratings passed in.
    pub team_b: Vec<Rating>,
    /// Points gained by every member of team A (and lost by every member of team B).
    pub delta: Rating,
}

/// Rate a match between two teams of any size.
///
/// Each team plays with the average of its members' ratings. The resulting change is computed once
/// and applied to every member: team A moves by `delta`, team B by `-delta`, regardless of how the
/// individual members compare to the opposing average.
pub fn update_teams(
    team_a: &[Rating],
    team_b: &[Rating],
    team_a_won: bool,
    k: f64,
) -> Result<TeamUpdate, MatchError> {
    let expected_a = expected_score(team_rating(team_a)?, team_rating(team_b)?);
    let score_a = if team_a_won { 1.0 } else { 0.0 };
    let delta = round(k * (score_a - expected_a));
    Ok(TeamUpdate {
        team_a: team_a.iter().map(|r| r.saturating_add(delta)).collect(),
        team_b: team_b.iter().map(|r| r.saturating_sub(delta)).collect(),
        delta,
    })
}

/// Rate a match between two individual players.
///
/// `score_a` is 1 if player A won and 0 if they lost. Each player's new rating is computed and
/// rounded on its own, so the two changes can differ by a point; they are not forced to mirror
/// each other.
pub fn update_pair(rating_a: Rating, rating_b: Rating, score_a: f64, k: f64) -> (Rating, Rating) {
    let (a, b) = (rating_a as f64, rating_b as f64);
    let expected_a = expected_score(a, b);
    let expected_b = 1.0 - expected_a;
    let score_b = 1.0 - score_a;
    (
        round(a + k * (score_a - expected_a)),
        round(b + k * (score_b - expected_b)),
    )
}

/// Round half away from zero. Out-of-range values saturate at the bounds of [`Rating`].
fn round(rating: f64) -> Rating {
    rating.round() as Rating
}
