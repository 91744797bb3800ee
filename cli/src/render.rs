use ansi_term::{Colour, Style};
use itertools::Itertools;
use volley_ladder_core::{
    history::{MatchKind, MatchRecord, Participant},
    ladder::SkippedRow,
    rating::Rating,
    stats::{Standing, Summary},
    team::Side,
};

/// A rating change with an explicit sign, e.g. `+16` or `-16`.
pub fn format_change(change: Rating) -> String {
    format!("{change:+}")
}

fn paint_change(change: Rating) -> String {
    let text = format_change(change);
    match change {
        c if c > 0 => Colour::Green.paint(text).to_string(),
        c if c < 0 => Colour::Red.paint(text).to_string(),
        _ => text,
    }
}

pub fn standings(standings: &[Standing]) -> String {
    if standings.is_empty() {
        return "No players in the ladder yet.\n".into();
    }

    let width = standings
        .iter()
        .map(|s| s.player.as_str().chars().count())
        .max()
        .unwrap_or_default()
        .max("Player".len());
    let header = format!(
        "{:>4}  {:<width$}  {:>6}  {:>7}  {:>4}  {:>8}",
        "Rank", "Player", "Rating", "Matches", "Wins", "Win rate"
    );
    let mut rows = standings.iter().map(|s| {
        let line = format!(
            "{:>4}  {:<width$}  {:>6}  {:>7}  {:>4}  {:>7.1}%",
            s.rank,
            s.player.as_str(),
            s.rating,
            s.matches,
            s.wins,
            s.win_rate
        );
        if s.rank <= 3 {
            Style::new().bold().paint(line).to_string()
        } else {
            line
        }
    });
    format!(
        "{}\n{}\n",
        Style::new().underline().paint(header),
        rows.join("\n")
    )
}

pub fn player(standing: &Standing) -> String {
    format!(
        "#{} {}: rating {} ({} since first match), {} wins in {} matches ({:.1}%)",
        standing.rank,
        Style::new().bold().paint(standing.player.as_str()),
        standing.rating,
        paint_change(standing.net_change),
        standing.wins,
        standing.matches,
        standing.win_rate
    )
}

pub fn summary(summary: &Summary) -> String {
    let mut lines = vec![
        format!("Total matches: {}", summary.total_matches),
        format!("Active players: {}", summary.active_players),
    ];
    if let Some(best) = &summary.highest_rated {
        lines.push(format!("Highest rated: {} ({})", best.player, best.rating));
    }
    if !summary.team_sizes.is_empty() {
        let sizes = summary
            .team_sizes
            .iter()
            .map(|count| format!("{}v{}: {}", count.sizes.0, count.sizes.1, count.matches))
            .join(", ");
        lines.push(format!("Formats: {sizes}"));
    }
    lines.join("\n") + "\n"
}

fn side(record: &MatchRecord, side: Side) -> String {
    let players = record.side(side).map(|p| participant(record, p)).join(", ");
    if record.winner == side {
        format!("{} \u{1f3d0}", Style::new().bold().paint(players))
    } else {
        players
    }
}

fn participant(record: &MatchRecord, p: &Participant) -> String {
    match record.kind {
        MatchKind::Pair => format!(
            "{} {} \u{2192} {} ({})",
            p.player,
            p.before,
            p.after,
            paint_change(p.change())
        ),
        MatchKind::Team => format!("{} ({})", p.player, p.before),
    }
}

/// Matches in the order given, one per line.
pub fn recent_matches(records: &[&MatchRecord]) -> String {
    if records.is_empty() {
        return "No match history available yet.\n".into();
    }
    records
        .iter()
        .map(|record| {
            let line = format!(
                "{} vs {}",
                side(record, Side::TeamA),
                side(record, Side::TeamB)
            );
            match record.kind {
                MatchKind::Pair => line,
                MatchKind::Team => format!(
                    "{line}: {} / {}",
                    paint_change(record.change(Side::TeamA)),
                    paint_change(record.change(Side::TeamB))
                ),
            }
        })
        .join("\n")
        + "\n"
}

pub fn skipped(source: &str, skipped: &SkippedRow) -> String {
    format!(
        "{} {source}: row {}: {}",
        Colour::Yellow.paint("skipped"),
        skipped.row + 1,
        skipped.reason
    )
}
