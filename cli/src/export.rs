use anyhow::Context;
use csv::WriterBuilder;
use serde::Serialize;
use std::{fs::File, io::Write, path::Path};
use volley_ladder_core::{rating::Rating, stats::RatedPlayer};

const HEADER: [&str; 2] = ["Player", "ELO_Rating"];

#[derive(Serialize)]
struct Row<'a> {
    player: &'a str,
    rating: Rating,
}

/// Write the standings as CSV, best first, with a header row even if there are no players.
pub fn write_standings(writer: impl Write, rows: &[RatedPlayer]) -> anyhow::Result<()> {
    let mut csv = WriterBuilder::new().has_headers(false).from_writer(writer);
    csv.write_record(HEADER)?;
    for row in rows {
        csv.serialize(Row {
            player: row.player.as_str(),
            rating: row.rating,
        })?;
    }
    csv.flush()?;
    Ok(())
}

pub fn write_standings_file(path: &Path, rows: &[RatedPlayer]) -> anyhow::Result<()> {
    let file = File::create(path).context(format!("creating {}", path.display()))?;
    write_standings(file, rows).context(format!("writing {}", path.display()))?;
    tracing::info!(players = rows.len(), path = %path.display(), "exported standings");
    Ok(())
}
