use anyhow::Context;
use clap::{Parser, Subcommand};
use std::{
    io::{stdin, stdout},
    path::{Path, PathBuf},
    process::exit,
};
use tracing_subscriber::EnvFilter;
use volley_ladder_core::{
    ladder::{Ladder, LadderConfig},
    rating::Rating,
    stats,
};

mod export;
mod ingest;
mod render;
mod session;

/// Volleyball ELO ladder.
///
/// Match results are read from CSV files with the columns Player1,Player2,Result (one-on-one,
/// result 1 or 2) or TeamA,TeamB,Winner (comma-separated teams, winner Team_A or Team_B). Files are
/// processed in the order given; ratings only live as long as the command runs.
#[derive(Parser)]
struct Options {
    /// Rating of a player the first time they appear in a match.
    #[clap(
        long,
        env = "VOLLEY_LADDER_STARTING_RATING",
        default_value = "1400",
        allow_negative_numbers = true
    )]
    starting_rating: Rating,

    /// Maximum rating swing per match.
    #[clap(short, long, env = "VOLLEY_LADDER_K_FACTOR", default_value = "32")]
    k_factor: f64,

    #[clap(subcommand)]
    command: Command,
}

impl Options {
    fn config(&self) -> LadderConfig {
        LadderConfig {
            starting_rating: self.starting_rating,
            k_factor: self.k_factor,
        }
    }
}

#[derive(Subcommand)]
enum Command {
    /// Rate the given match files and print the ladder.
    Ladder {
        #[clap(required = true)]
        files: Vec<PathBuf>,
    },

    /// Rate the given match files and print statistics and recent matches.
    Stats {
        #[clap(required = true)]
        files: Vec<PathBuf>,

        /// Number of recent matches to show.
        #[clap(short, long, default_value = "10")]
        recent: usize,
    },

    /// Rate the given match files and export the standings as CSV.
    Export {
        #[clap(required = true)]
        files: Vec<PathBuf>,

        /// Output file. Standings are written to stdout if omitted or `-`.
        #[clap(short, long)]
        output: Option<PathBuf>,
    },

    /// Read JSON requests from stdin, one per line, and answer each on stdout.
    Session,
}

impl Command {
    fn run(&self, ladder: &mut Ladder) -> anyhow::Result<()> {
        match self {
            Self::Ladder { files } => {
                load(ladder, files)?;
                print!("{}", render::standings(&stats::standings(ladder)));
            }
            Self::Stats { files, recent } => {
                load(ladder, files)?;
                println!("{}", render::summary(&stats::summary(ladder)));
                for standing in stats::standings(ladder) {
                    println!("{}", render::player(&standing));
                }
                println!();
                print!(
                    "{}",
                    render::recent_matches(&stats::recent_matches(ladder, *recent))
                );
            }
            Self::Export { files, output } => {
                load(ladder, files)?;
                let rows = stats::export_rows(ladder);
                match output {
                    Some(path) if path != Path::new("-") => {
                        export::write_standings_file(path, &rows)?
                    }
                    _ => export::write_standings(stdout().lock(), &rows)?,
                }
            }
            Self::Session => session::run(ladder, stdin().lock(), stdout().lock())?,
        }
        Ok(())
    }
}

/// Rate every file in order, one batch per file.
fn load(ladder: &mut Ladder, files: &[PathBuf]) -> anyhow::Result<()> {
    for path in files {
        let requests = ingest::read_matches(path)?;
        let outcome = ladder
            .process_batch(&requests)
            .context(format!("rating matches from {}", path.display()))?;
        for skipped in &outcome.skipped {
            eprintln!("{}", render::skipped(&path.display().to_string(), skipped));
        }
        tracing::info!(
            path = %path.display(),
            applied = outcome.applied.len(),
            skipped = outcome.skipped.len(),
            "loaded matches"
        );
    }
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .init();
    let opt = Options::parse();

    if let Err(err) = run(&opt) {
        eprintln!("{err:#}");
        exit(1);
    }
}

fn run(opt: &Options) -> anyhow::Result<()> {
    let mut ladder = Ladder::new(opt.config()).context("invalid ladder configuration")?;
    opt.command.run(&mut ladder)
}
