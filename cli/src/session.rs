//! Line-delimited JSON session.
//!
//! Each input line is a [`Request`]; each produces exactly one [`Report`] line on the output. The
//! session owns one ladder for as long as the input stays open.

use anyhow::Context;
use std::io::{BufRead, Write};
use volley_ladder_core::{
    error::MatchError,
    history::MatchRecord,
    ladder::Ladder,
    message::{MatchRequest, Report, Request},
    stats,
};

pub fn run(
    ladder: &mut Ladder,
    mut input: impl BufRead,
    mut output: impl Write,
) -> anyhow::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if input
            .read_until(b'\n', &mut buf)
            .context("reading request")?
            == 0
        {
            break;
        }

        let report = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match parse(line) {
                Ok(request) => handle(ladder, request),
                Err(report) => report,
            },
            Err(err) => {
                tracing::warn!("request is not valid UTF-8: {err}");
                Report::Rejected {
                    reason: format!("invalid request: {err}"),
                }
            }
        };

        serde_json::to_writer(&mut output, &report).context("writing report")?;
        writeln!(output)?;
        output.flush()?;
    }
    tracing::info!("session closed");
    Ok(())
}

fn parse(line: &str) -> Result<Request, Report> {
    serde_json::from_str(line).map_err(|err| {
        tracing::warn!(line = line.trim_end(), "invalid request: {err:#}");
        Report::Rejected {
            reason: format!("invalid request: {err}"),
        }
    })
}

fn handle(ladder: &mut Ladder, request: Request) -> Report {
    tracing::debug!(?request, "request");
    match request {
        Request::Team(m) => {
            let res = ladder.process(&MatchRequest::from(m));
            recorded(ladder, res)
        }
        Request::Pair(m) => {
            let res = ladder.process(&MatchRequest::from(m));
            recorded(ladder, res)
        }
        Request::Batch { matches } => match ladder.process_batch(&matches) {
            Ok(outcome) => Report::Batch {
                applied: outcome.applied,
                skipped: outcome.skipped,
                standings: stats::standings(ladder),
            },
            Err(err) => rejected(err),
        },
        Request::Reset => {
            ladder.reset();
            Report::Reset {
                standings: stats::standings(ladder),
            }
        }
        Request::Standings => Report::Standings {
            standings: stats::standings(ladder),
        },
        Request::Player { name } => match stats::player_stats(ladder, &name) {
            Some(standing) => Report::Player { standing },
            None => Report::Rejected {
                reason: format!("unknown player {name:?}"),
            },
        },
        Request::Summary => Report::Summary {
            summary: stats::summary(ladder),
        },
        Request::Recent { count } => Report::Recent {
            matches: stats::recent_matches(ladder, count)
                .into_iter()
                .cloned()
                .collect(),
        },
    }
}

fn recorded(ladder: &Ladder, res: Result<MatchRecord, MatchError>) -> Report {
    match res {
        Ok(record) => Report::Recorded {
            record,
            standings: stats::standings(ladder),
        },
        Err(err) => rejected(err),
    }
}

fn rejected(err: MatchError) -> Report {
    if err.is_row_error() {
        tracing::warn!("match rejected: {err}");
    } else {
        tracing::error!("match processing failed: {err}");
    }
    Report::Rejected {
        reason: err.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn session(ladder: &mut Ladder, requests: &[Value]) -> Vec<Value> {
        let input = requests
            .iter()
            .map(|request| format!("{request}\n"))
            .collect::<String>();
        let mut output = Vec::new();
        run(ladder, input.as_bytes(), &mut output).unwrap();
        String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect()
    }

    #[test]
    fn record_and_query() {
        let mut ladder = Ladder::default();
        let reports = session(
            &mut ladder,
            &[
                json!({"type": "team", "team_a": "Alice, Bob, Charlie", "team_b": "David, Eve", "winner": "Team_A"}),
                json!({"type": "player", "name": "Eve"}),
                json!({"type": "recent", "count": 5}),
            ],
        );
        assert_eq!(reports.len(), 3);

        assert_eq!(reports[0]["type"], "recorded");
        assert_eq!(reports[0]["record"]["kind"], "team");
        assert_eq!(reports[0]["record"]["winner"], "Team_A");
        assert_eq!(reports[0]["standings"][0]["player"], "Alice");
        assert_eq!(reports[0]["standings"][0]["rating"], 1416);

        assert_eq!(reports[1]["type"], "player");
        assert_eq!(reports[1]["standing"]["rating"], 1384);
        assert_eq!(reports[1]["standing"]["rank"], 5);

        assert_eq!(reports[2]["type"], "recent");
        assert_eq!(reports[2]["matches"].as_array().unwrap().len(), 1);
    }

    #[test]
    fn bad_requests_do_not_end_the_session() {
        let mut ladder = Ladder::default();
        let input = "not json\n\n{\"type\":\"pair\",\"player1\":\"Alice\",\"player2\":\"Bob\",\"result\":\"3\"}\n{\"type\":\"summary\"}\n";
        let mut output = Vec::new();
        run(&mut ladder, input.as_bytes(), &mut output).unwrap();
        let reports = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0]["type"], "rejected");
        assert_eq!(reports[1]["type"], "rejected");
        assert_eq!(
            reports[1]["reason"],
            "invalid result \"3\", expected 1 or 2"
        );
        assert_eq!(reports[2]["type"], "summary");
        assert_eq!(reports[2]["summary"]["total_matches"], 0);
    }

    #[test]
    fn batch_then_reset() {
        let mut ladder = Ladder::default();
        let reports = session(
            &mut ladder,
            &[
                json!({"type": "batch", "matches": [
                    {"type": "pair", "player1": "Alice", "player2": "Bob", "result": "1"},
                    {"type": "team", "team_a": "Alice", "team_b": "Carol", "winner": "Team_C"},
                    {"type": "team", "team_a": "Bob, Carol", "team_b": "Alice", "winner": "Team_A"},
                ]}),
                json!({"type": "reset"}),
                json!({"type": "standings"}),
                json!({"type": "player", "name": "Alice"}),
            ],
        );

        assert_eq!(reports[0]["type"], "batch");
        assert_eq!(reports[0]["applied"].as_array().unwrap().len(), 2);
        assert_eq!(reports[0]["skipped"], json!([{"row": 1, "reason": "invalid winner \"Team_C\", expected Team_A or Team_B"}]));
        assert_eq!(reports[1], json!({"type": "reset", "standings": []}));
        assert_eq!(reports[2], json!({"type": "standings", "standings": []}));
        assert_eq!(reports[3]["type"], "rejected");
        assert!(ladder.history().is_empty());
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let mut ladder = Ladder::default();
        let mut output = Vec::new();
        run(
            &mut ladder,
            &b"\xff\xfe\n{\"type\":\"summary\"}\n"[..],
            &mut output,
        )
        .unwrap();
        let reports = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str::<Value>(line).unwrap())
            .collect::<Vec<_>>();

        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0]["type"], "rejected");
        assert_eq!(reports[1]["type"], "summary");
    }

    #[test]
    fn last_line_without_newline() {
        let mut ladder = Ladder::default();
        let mut output = Vec::new();
        run(&mut ladder, &b"{\"type\":\"standings\"}"[..], &mut output).unwrap();
        assert_eq!(
            String::from_utf8(output).unwrap(),
            "{\"type\":\"standings\",\"standings\":[]}\n"
        );
    }
}
