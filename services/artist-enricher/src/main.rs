//!
//! src/main.rs  Andrew Belles  Oct 2nd, 2025
//!
//! Entry point of the artist enricher: reads the billboard song table,
//! looks every artist up on spotify and writes genre, artist uri and
//! image per song. Also hosts the single-artist lookup and genre tally.
//!

mod config;
mod errors;
mod logging;

mod fetch;
mod genre;
mod normalize;
mod pipeline;
mod resolver;
mod sink;
mod source;
mod types;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::errors::EnricherError;
use crate::fetch::SpotifyCatalog;
use crate::genre::GenrePriority;
use crate::pipeline::Pipeline;
use crate::sink::CsvSink;

/// Enrich a song table with spotify artist metadata
#[derive(Parser, Debug)]
#[command(name = "artist-enricher", version, long_about = None)]
struct Cli {
    /// Song table to read (overrides ENRICH_INPUT)
    #[arg(long, global = true)]
    input: Option<PathBuf>,

    /// Metadata table to write (overrides ENRICH_OUTPUT)
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up every artist and write the metadata table (default)
    Enrich,
    /// Print the ranked spotify matches for one "Surname, First" name
    Lookup {
        artist: String,
    },
    /// Print how often each genre tag occurs across the matched artists
    Genres,
}

fn genre_table(cfgs: &AppConfig) -> Result<GenrePriority, EnricherError> {
    let table = match &cfgs.io.genre_priority_file {
        Some(path) => GenrePriority::from_json_file(path)?,
        None => GenrePriority::default()
    };
    tracing::debug!(entries = table.entries().len(), "genre.table");
    Ok(table)
}

async fn run(cli: Cli, cfgs: AppConfig) -> Result<(), EnricherError> {
    let genres  = genre_table(&cfgs)?;
    let catalog = SpotifyCatalog::new(&cfgs.http, &cfgs.spotify)?;
    let pipeline = Pipeline::new(catalog, genres);

    let input = cli.input.unwrap_or(cfgs.io.input_path);
    match cli.command.unwrap_or(Command::Enrich) {
        Command::Enrich => {
            let rows = source::read_input(&input, &cfgs.io.artist_column)?;
            let metadata = pipeline.enrich(&rows).await?;
            let output = cli.output.unwrap_or(cfgs.io.output_path);
            CsvSink::new(output).write(&metadata)?;
        }
        Command::Lookup { artist } => {
            let ranked = pipeline.lookup(&artist).await?;
            println!("{}", serde_json::to_string_pretty(&ranked)?);
        }
        Command::Genres => {
            let rows = source::read_input(&input, &cfgs.io.artist_column)?;
            let tally = pipeline.tally_genres(&rows).await?;
            println!("{}", serde_json::to_string_pretty(&tally)?);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), EnricherError> {
    let cli  = Cli::parse();
    let cfgs = config::load_config()?;
    let _logging = logging::init_logging(&cfgs.logging)?;

    tracing::info!(
        service="artist-enricher",
        version=%env!("CARGO_PKG_VERSION"),
        "starting"
    );

    let result = run(cli, cfgs).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "enricher.failed");
    }
    result
}
