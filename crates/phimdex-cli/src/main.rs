use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use phimdex_config::{Config, PathManager};
use phimdex_models::MediaType;

use commands::{clear, providers, refresh, resolve, streams};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "phimdex")]
#[command(about = "phimdex - aggregate streaming sources for movies and series")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    /// Write logs to this file (daily rotation) instead of stderr
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MediaTypeArg {
    Movie,
    Tv,
}

impl From<MediaTypeArg> for MediaType {
    fn from(value: MediaTypeArg) -> Self {
        match value {
            MediaTypeArg::Movie => MediaType::Movie,
            MediaTypeArg::Tv => MediaType::Tv,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Refresh the movie cache from the master-list provider
    #[command(
        long_about = "Walk the master-list provider's latest titles and merge every candidate into the movie cache. Repeated runs converge on one record per title; previously learned fields are never erased by shallow list data."
    )]
    Refresh {
        /// Number of list pages to fetch (defaults to the configured value)
        #[arg(long, value_name = "N")]
        pages: Option<u32>,

        /// Also fetch each title's full record (trailer, description, runtime)
        #[arg(long, action = ArgAction::SetTrue)]
        enrich: bool,
    },
    /// Aggregate stream sources for one title from every provider
    #[command(
        long_about = "Fan out to every registered provider for a title and print the merged stream sources. The id may be an internal id, an external catalog id, or a provider slug; cached records resolve to their canonical external id and original title before the fan-out."
    )]
    Streams {
        /// Movie reference: internal id, external catalog id, or provider slug
        id: String,

        /// Media type used when the id is not cached
        #[arg(long, value_enum, default_value = "movie")]
        media_type: MediaTypeArg,

        /// Original title for providers that cannot resolve the id directly
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,
    },
    /// Resolve a movie reference to its canonical cached record
    #[command(
        long_about = "Resolve an ambiguous movie reference (internal id, external id, or provider slug) to the canonical cached record, optionally creating it from supplied data when nothing matches."
    )]
    Resolve {
        /// Movie reference: internal id, external catalog id, or provider slug
        id: String,

        /// Explicit external catalog id
        #[arg(long, value_name = "ID")]
        external_id: Option<String>,

        /// Title used to create the record when nothing matches
        #[arg(long, value_name = "TITLE")]
        title: Option<String>,

        /// Media type for a created record (defaults to movie)
        #[arg(long, value_enum)]
        media_type: Option<MediaTypeArg>,
    },
    /// List registered providers and their capabilities
    Providers,
    /// Clear the cached movie table
    Clear,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet, cli.log_file.clone())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let paths = PathManager::default();
    paths.ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;
    let config = Config::load_or_default(&paths.config_file())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    match cli.command {
        Commands::Refresh { pages, enrich } => {
            refresh::run_refresh(&config, &paths, pages, enrich, cli.output, cli.quiet).await
        }
        Commands::Streams {
            id,
            media_type,
            title,
        } => {
            streams::run_streams(&config, &paths, &id, media_type.into(), title, cli.output).await
        }
        Commands::Resolve {
            id,
            external_id,
            title,
            media_type,
        } => {
            resolve::run_resolve(
                &paths,
                &id,
                external_id,
                title,
                media_type.map(Into::into),
                cli.output,
            )
            .await
        }
        Commands::Providers => providers::run_providers(&config, cli.output),
        Commands::Clear => clear::run_clear(&paths).await,
    }
}
