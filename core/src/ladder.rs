use crate::{
    error::{ConfigError, MatchError},
    history::{MatchHistory, MatchKind, MatchRecord, Participant},
    message::{MatchRequest, PairMatch, TeamMatch},
    rating::{self, Rating, K_FACTOR, STARTING_RATING},
    store::RatingStore,
    team::{PairResult, PlayerId, Side, Team},
};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct LadderConfig {
    /// Rating of a player the first time they appear in a match.
    pub starting_rating: Rating,
    /// Sensitivity of rating swings.
    pub k_factor: f64,
}

impl LadderConfig {
    /// Check that the configuration can rate matches.
    ///
    /// The K-factor must be finite and positive: zero or NaN would leave every rating unchanged,
    /// and a negative K would make winners lose points.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.k_factor.is_finite() && self.k_factor > 0.0 {
            Ok(())
        } else {
            Err(ConfigError::InvalidKFactor {
                k_factor: self.k_factor,
            })
        }
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            starting_rating: STARTING_RATING,
            k_factor: K_FACTOR,
        }
    }
}

/// A submitted match that was not rated.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SkippedRow {
    /// Position of the match in the batch, starting from 0.
    pub row: usize,
    pub reason: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct BatchOutcome {
    pub applied: Vec<MatchRecord>,
    pub skipped: Vec<SkippedRow>,
}

/// The state of one ladder: player ratings and the matches that produced them.
///
/// Ratings and history only change together. Every rated match updates the store and appends
/// exactly one record, and [`reset`](Self::reset) clears both.
#[derive(Clone, Debug, Default)]
pub struct Ladder {
    config: LadderConfig,
    store: RatingStore,
    history: MatchHistory,
}

impl Ladder {
    pub fn new(config: LadderConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            store: RatingStore::new(config.starting_rating),
            history: Default::default(),
        })
    }

    pub fn store(&self) -> &RatingStore {
        &self.store
    }

    pub fn history(&self) -> &MatchHistory {
        &self.history
    }

    /// Rate a match between two teams given as comma-separated lists of names.
    ///
    /// Nothing changes if either team is invalid. Otherwise new players are registered (team A's in
    /// listed order, then team B's), every participant's rating is updated and the match is
    /// appended to the history.
    pub fn process_team_match(
        &mut self,
        team_a: &str,
        team_b: &str,
        winner: Side,
    ) -> Result<MatchRecord, MatchError> {
        let players_a = Team::parse(team_a, Side::TeamA)?;
        let players_b = Team::parse(team_b, Side::TeamB)?;
        check_disjoint(&players_a, &players_b)?;

        let before_a = self.fetch(&players_a);
        let before_b = self.fetch(&players_b);
        let update = rating::update_teams(
            &before_a,
            &before_b,
            winner == Side::TeamA,
            self.config.k_factor,
        )?;

        let participants = participants(&players_a, Side::TeamA, &before_a, &update.team_a)
            .chain(participants(
                &players_b,
                Side::TeamB,
                &before_b,
                &update.team_b,
            ))
            .collect();
        tracing::debug!(team_a, team_b, %winner, delta = update.delta, "rated team match");
        Ok(self.record(
            MatchKind::Team,
            team_a.to_string(),
            team_b.to_string(),
            winner,
            participants,
        ))
    }

    /// Rate a one-on-one match.
    pub fn process_pair_match(
        &mut self,
        player1: &str,
        player2: &str,
        result: PairResult,
    ) -> Result<MatchRecord, MatchError> {
        let player1 = Team::solo(player1, Side::TeamA)?;
        let player2 = Team::solo(player2, Side::TeamB)?;
        check_disjoint(&player1, &player2)?;

        let before1 = self.fetch(&player1);
        let before2 = self.fetch(&player2);
        let (after1, after2) =
            rating::update_pair(before1[0], before2[0], result.score(), self.config.k_factor);

        let participants = participants(&player1, Side::TeamA, &before1, &[after1])
            .chain(participants(&player2, Side::TeamB, &before2, &[after2]))
            .collect();
        tracing::debug!(%player1, %player2, %result, after1, after2, "rated pair match");
        Ok(self.record(
            MatchKind::Pair,
            player1.to_string(),
            player2.to_string(),
            result.winner(),
            participants,
        ))
    }

    /// Rate a match whose outcome is still an unparsed token.
    pub fn process(&mut self, request: &MatchRequest) -> Result<MatchRecord, MatchError> {
        match request {
            MatchRequest::Team(TeamMatch {
                team_a,
                team_b,
                winner,
            }) => {
                let winner = Side::from_token(winner)?;
                self.process_team_match(team_a, team_b, winner)
            }
            MatchRequest::Pair(PairMatch {
                player1,
                player2,
                result,
            }) => {
                let result = PairResult::from_token(result)?;
                self.process_pair_match(player1, player2, result)
            }
        }
    }

    /// Rate a sequence of matches in order.
    ///
    /// Each match is rated against the ratings left by the ones before it. Invalid matches are
    /// skipped and reported in the outcome; the rest of the batch still runs. Only an error that is
    /// not a [row error](MatchError::is_row_error) aborts the batch, in which case the matches
    /// before it remain applied.
    pub fn process_batch<'a>(
        &mut self,
        requests: impl IntoIterator<Item = &'a MatchRequest>,
    ) -> Result<BatchOutcome, MatchError> {
        self.run_batch(requests, Self::process)
    }

    fn run_batch<'a>(
        &mut self,
        requests: impl IntoIterator<Item = &'a MatchRequest>,
        mut rate: impl FnMut(&mut Self, &MatchRequest) -> Result<MatchRecord, MatchError>,
    ) -> Result<BatchOutcome, MatchError> {
        let mut outcome = BatchOutcome::default();
        for (row, request) in requests.into_iter().enumerate() {
            match rate(self, request) {
                Ok(record) => outcome.applied.push(record),
                Err(err) if err.is_row_error() => {
                    tracing::warn!(row, ?request, "skipping match: {err}");
                    outcome.skipped.push(SkippedRow {
                        row,
                        reason: err.to_string(),
                    });
                }
                Err(err) => {
                    tracing::error!(row, ?request, "aborting batch: {err}");
                    return Err(err);
                }
            }
        }
        tracing::info!(
            applied = outcome.applied.len(),
            skipped = outcome.skipped.len(),
            "processed batch"
        );
        Ok(outcome)
    }

    /// Forget every player and every match.
    pub fn reset(&mut self) {
        tracing::info!(
            players = self.store.len(),
            matches = self.history.len(),
            "resetting ladder"
        );
        self.store.reset();
        self.history.reset();
    }

    fn fetch(&mut self, team: &Team) -> Vec<Rating> {
        team.players()
            .iter()
            .map(|player| self.store.get_or_init(player))
            .collect()
    }

    fn record(
        &mut self,
        kind: MatchKind,
        team_a: String,
        team_b: String,
        winner: Side,
        participants: Vec<Participant>,
    ) -> MatchRecord {
        for p in &participants {
            self.store.set(&p.player, p.after);
        }
        let record = MatchRecord {
            kind,
            team_a,
            team_b,
            winner,
            participants,
        };
        self.history.append(record.clone());
        record
    }
}

fn check_disjoint(team_a: &Team, team_b: &Team) -> Result<(), MatchError> {
    match team_a.overlap(team_b) {
        Some(player) => Err(MatchError::PlayerOnBothSides {
            player: player.clone(),
        }),
        None => Ok(()),
    }
}

fn participants<'a>(
    team: &'a Team,
    side: Side,
    before: &'a [Rating],
    after: &'a [Rating],
) -> impl 'a + Iterator<Item = Participant> {
    team.players()
        .iter()
        .zip(before.iter().zip(after))
        .map(move |(player, (&before, &after))| Participant {
            player: PlayerId::clone(player),
            side,
            before,
            after,
        })
}
