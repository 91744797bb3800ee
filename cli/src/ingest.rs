//! Reading match results from CSV files.
//!
//! A file holds either one-on-one matches (`Player1,Player2,Result`) or team matches
//! (`TeamA,TeamB,Winner`); the header row decides which. Cells are passed on as written, so that
//! bad results and empty teams are reported per row by the ladder instead of failing the file.

use anyhow::{bail, Context};
use csv::{Reader, ReaderBuilder, StringRecord, Trim};
use serde::Deserialize;
use std::{io::Read, path::Path};
use volley_ladder_core::message::{MatchRequest, PairMatch, TeamMatch};

const PAIR_COLUMNS: [&str; 3] = ["Player1", "Player2", "Result"];
const TEAM_COLUMNS: [&str; 3] = ["TeamA", "TeamB", "Winner"];

#[derive(Debug, Deserialize)]
struct PairRow {
    #[serde(rename = "Player1")]
    player1: String,
    #[serde(rename = "Player2")]
    player2: String,
    #[serde(rename = "Result")]
    result: String,
}

#[derive(Debug, Deserialize)]
struct TeamRow {
    #[serde(rename = "TeamA")]
    team_a: String,
    #[serde(rename = "TeamB")]
    team_b: String,
    #[serde(rename = "Winner")]
    winner: String,
}

impl From<PairRow> for MatchRequest {
    fn from(row: PairRow) -> Self {
        PairMatch {
            player1: row.player1,
            player2: row.player2,
            result: row.result,
        }
        .into()
    }
}

impl From<TeamRow> for MatchRequest {
    fn from(row: TeamRow) -> Self {
        TeamMatch {
            team_a: row.team_a,
            team_b: row.team_b,
            winner: row.winner,
        }
        .into()
    }
}

pub fn read_matches(path: &Path) -> anyhow::Result<Vec<MatchRequest>> {
    let reader = ReaderBuilder::new()
        .trim(Trim::Headers)
        .from_path(path)
        .context(format!("opening {}", path.display()))?;
    parse_matches(reader).context(format!("reading {}", path.display()))
}

pub fn parse_matches<R: Read>(mut reader: Reader<R>) -> anyhow::Result<Vec<MatchRequest>> {
    let headers = reader.headers()?.clone();
    if has_columns(&headers, &PAIR_COLUMNS) {
        collect_rows::<PairRow, _>(reader)
    } else if has_columns(&headers, &TEAM_COLUMNS) {
        collect_rows::<TeamRow, _>(reader)
    } else {
        bail!(
            "CSV must contain columns {} or {}",
            PAIR_COLUMNS.join(","),
            TEAM_COLUMNS.join(",")
        )
    }
}

fn has_columns(headers: &StringRecord, columns: &[&str]) -> bool {
    columns
        .iter()
        .all(|column| headers.iter().any(|header| header == *column))
}

fn collect_rows<T, R>(mut reader: Reader<R>) -> anyhow::Result<Vec<MatchRequest>>
where
    T: for<'de> Deserialize<'de> + Into<MatchRequest>,
    R: Read,
{
    let requests = reader
        .deserialize::<T>()
        .map(|row| Ok(row?.into()))
        .collect::<anyhow::Result<Vec<MatchRequest>>>()?;
    tracing::debug!(rows = requests.len(), "read matches");
    Ok(requests)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn parse(data: &str) -> anyhow::Result<Vec<MatchRequest>> {
        parse_matches(
            ReaderBuilder::new()
                .trim(Trim::Headers)
                .from_reader(data.as_bytes()),
        )
    }

    #[test]
    fn pair_file() {
        let requests = parse("Player1,Player2,Result\nAlice,Bob,1\n Bob , Charlie ,2\n").unwrap();
        assert_eq!(
            requests,
            [
                MatchRequest::Pair(PairMatch {
                    player1: "Alice".into(),
                    player2: "Bob".into(),
                    result: "1".into(),
                }),
                MatchRequest::Pair(PairMatch {
                    player1: " Bob ".into(),
                    player2: " Charlie ".into(),
                    result: "2".into(),
                }),
            ]
        );
    }

    #[test]
    fn team_file_with_quoted_teams() {
        let requests = parse(
            "Date, TeamA , TeamB ,Winner\n\
             2024-05-01,\"Alice, Bob\",\"Carol,Dave, Eve\",Team_B\n",
        )
        .unwrap();
        assert_eq!(
            requests,
            [MatchRequest::Team(TeamMatch {
                team_a: "Alice, Bob".into(),
                team_b: "Carol,Dave, Eve".into(),
                winner: "Team_B".into(),
            })]
        );
    }

    #[test]
    fn bad_tokens_are_left_to_the_ladder() {
        let requests = parse("TeamA,TeamB,Winner\nAlice,Bob,Team_C\n,Bob,Team_A\n").unwrap();
        assert_eq!(requests.len(), 2);
    }

    #[test]
    fn unknown_columns_are_rejected() {
        let err = parse("Home,Away,Score\nAlice,Bob,1\n").unwrap_err();
        assert!(err.to_string().contains("CSV must contain columns"));
    }

    #[test]
    fn read_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("matches.csv");
        fs::write(&path, "Player1,Player2,Result\nAlice,Bob,2\n").unwrap();
        assert_eq!(read_matches(&path).unwrap().len(), 1);

        let err = read_matches(&dir.path().join("missing.csv")).unwrap_err();
        assert!(format!("{err:#}").contains("missing.csv"));
    }
}
