///
/// This module implements the CLI interface for cricsheet-bbb: command parsing,
/// argument handling and the user-visible summary line.
///
/// All data handling (archive scanning, filtering, flattening, CSV output) lives in
/// the [`cricsheet-bbb-core`] crate. This module only wires configuration and
/// fetchers together.
///
/// ## Subcommands
/// - `fetch`: download (or read) the Test archive, keep the configured series and
///   write one CSV row per delivery.
/// - `flatten`: flatten a single match JSON file without filtering.
///
/// Call [`run`] with a constructed [`Cli`] for programmatic use and integration tests.
///
/// [`cricsheet-bbb-core`]: ../../cricsheet-bbb-core/
use crate::load_config::{load_config, CliConfig};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cricsheet_bbb_core::assemble::write_dataset;
use cricsheet_bbb_core::contract::ArchiveFetcher;
use cricsheet_bbb_core::document::parse_document;
use cricsheet_bbb_core::download::{HttpArchiveFetcher, LocalArchiveFetcher};
use cricsheet_bbb_core::flatten::flatten;
use cricsheet_bbb_core::pipeline;
use std::path::PathBuf;

/// CLI for cricsheet-bbb: ball-by-ball CSV exports of Cricsheet Test data.
#[derive(Parser)]
#[clap(
    name = "cricsheet-bbb",
    version,
    about = "Flatten Cricsheet Test match archives into a ball-by-ball CSV"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the Test archive, filter to the configured series and write the CSV
    Fetch {
        /// Path to the YAML config file (defaults apply when omitted)
        #[clap(long)]
        config: Option<PathBuf>,
        /// Read the archive from a local zip instead of downloading it
        #[clap(long)]
        archive: Option<PathBuf>,
        /// Output CSV path, overrides the config file
        #[clap(long)]
        output: Option<PathBuf>,
    },
    /// Flatten a single match JSON file, without any filtering
    Flatten {
        /// Path to a Cricsheet match JSON file
        #[clap(long)]
        input: PathBuf,
        /// Output CSV path (defaults to the input path with a .csv extension)
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

/// Async CLI entrypoint shared by main() and the integration tests.
pub async fn run(cli: Cli) -> Result<()> {
    tracing::info!("trace_initialised");

    match cli.command {
        Commands::Fetch {
            config,
            archive,
            output,
        } => {
            let mut config = match config {
                Some(path) => load_config(path)?,
                None => CliConfig::from_env(),
            };
            if let Some(output) = output {
                config.output.path = output;
            }
            let pipeline_config = config.pipeline_config()?;

            let fetcher: Box<dyn ArchiveFetcher> = match archive {
                Some(path) => {
                    tracing::info!(command = "fetch", archive = %path.display(), "Using local archive");
                    Box::new(LocalArchiveFetcher::new(path))
                }
                None => Box::new(HttpArchiveFetcher::new(config.download_config()?)),
            };

            tracing::info!(command = "fetch", "Starting ball-by-ball extraction");
            match pipeline::run(&pipeline_config, fetcher.as_ref()).await {
                Ok(report) => {
                    if !report.malformed.is_empty() || !report.date_warnings.is_empty() {
                        tracing::warn!(
                            command = "fetch",
                            malformed = report.malformed.len(),
                            date_warnings = report.date_warnings.len(),
                            "Extraction finished with skipped entries"
                        );
                    }
                    tracing::info!(command = "fetch", ?report, "Extraction complete");
                    println!(
                        "Saved {} with {} balls",
                        pipeline_config.output_path.display(),
                        report.deliveries
                    );
                    Ok(())
                }
                Err(e) => {
                    tracing::error!(command = "fetch", error = %e, "Extraction failed");
                    Err(anyhow::Error::new(e))
                }
            }
        }
        Commands::Flatten { input, output } => {
            let output = output.unwrap_or_else(|| input.with_extension("csv"));
            tracing::info!(command = "flatten", input = %input.display(), "Flattening single match");

            let bytes = tokio::fs::read(&input)
                .await
                .with_context(|| format!("Failed to read match file {}", input.display()))?;
            let document = parse_document(&bytes)
                .with_context(|| format!("Failed to parse match file {}", input.display()))?;
            let records = flatten(&document);
            let rows = write_dataset(&records, &output)
                .with_context(|| format!("Failed to write {}", output.display()))?;

            tracing::info!(command = "flatten", rows, "Flatten complete");
            println!("Saved {} with {} balls", output.display(), rows);
            Ok(())
        }
    }
}
