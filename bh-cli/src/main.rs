//! Bullhorn CLI - Command-line front end for the Bullhorn REST client.
//!
//! Reads the session token and REST URL from the config file or from
//! `BULLHORN_SESSION_TOKEN` / `BULLHORN_REST_URL`, then runs one query and
//! prints the records as a table or as JSON.

mod commands;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::{Parser, Subcommand};
use console::style;
use tracing::{info, warn};

use bh_api::EntityType;
use bh_core::config::AppConfig;
use bh_core::error::BhError;
use bh_core::logging::{self, LogGuard};

/// Bullhorn - query the Bullhorn CRM REST API.
#[derive(Parser)]
#[command(
    name = "bullhorn",
    version,
    about = "Bullhorn CRM REST API client",
    long_about = "A command-line client for the Bullhorn CRM REST API.\n\
                   Requires an existing session: export BULLHORN_SESSION_TOKEN and BULLHORN_REST_URL\n\
                   or set them in the config file."
)]
struct Cli {
    /// Path to the configuration file.
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json).
    #[arg(short = 'f', long, global = true, default_value = "text")]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses.
#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// JSON output for scripting.
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the session is valid and show when it expires.
    Ping,
    /// Search candidates.
    Candidates(commands::search::SearchArgs),
    /// Search jobs (job orders).
    Jobs(commands::search::SearchArgs),
    /// Search placements.
    Placements(commands::search::SearchArgs),
    /// Search or query any supported entity type.
    Search {
        /// Entity type (candidate, job, placement, contact, corporation, user, submission).
        entity: String,
        #[command(flatten)]
        args: commands::search::SearchArgs,
    },
    /// Fetch a single entity by id.
    Entity {
        /// Entity type.
        entity: String,
        /// Entity id.
        id: i64,
        /// Comma-separated field list.
        #[arg(long, default_value = "id")]
        fields: String,
    },
    /// Read corporation settings.
    Settings {
        /// Comma-separated setting names.
        names: String,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli)?;
    let _guard = init_logging(&config)?;

    info!("Bullhorn CLI v{}", bh_core::constants::APP_VERSION);

    let api = commands::create_api_client(&config)?;

    // Dispatch to command handlers
    match cli.command {
        Commands::Ping => commands::session::ping(&api, cli.format).await?,
        Commands::Candidates(args) => {
            commands::search::run(&api, EntityType::Candidate, args, cli.format).await?
        }
        Commands::Jobs(args) => {
            commands::search::run(&api, EntityType::JobOrder, args, cli.format).await?
        }
        Commands::Placements(args) => {
            commands::search::run(&api, EntityType::Placement, args, cli.format).await?
        }
        Commands::Search { entity, args } => {
            let entity: EntityType = entity.parse()?;
            commands::search::run(&api, entity, args, cli.format)
                .await
                .with_context(|| format!("{entity} search failed"))?
        }
        Commands::Entity { entity, id, fields } => {
            let entity: EntityType = entity.parse()?;
            commands::entity::run(&api, entity, id, &fields, cli.format)
                .await
                .with_context(|| format!("cannot fetch {entity} {id}"))?
        }
        Commands::Settings { names } => {
            commands::session::settings(&api, &names, cli.format).await?
        }
    }
    Ok(())
}

/// Load the config file, then let environment variables win over it.
fn load_config(cli: &Cli) -> anyhow::Result<AppConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => AppConfig::load_from_file(Path::new(path))
            .with_context(|| format!("cannot load config file {path}"))?,
        None => {
            let default_path = AppConfig::default_config_path()?;
            if default_path.exists() {
                AppConfig::load_from_file(&default_path).with_context(|| {
                    format!("cannot load config file {}", default_path.display())
                })?
            } else {
                AppConfig::default()
            }
        }
    };
    config.apply_env_overrides();
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    Ok(config)
}

/// File plus console logging, or console only when the log directory is unusable.
fn init_logging(config: &AppConfig) -> anyhow::Result<Option<LogGuard>> {
    let file_logging = config
        .effective_log_dir()
        .and_then(|dir| logging::init_logging(&config.logging, &dir));
    match file_logging {
        Ok(guard) => Ok(Some(guard)),
        Err(e) => {
            logging::init_console_logging(&config.logging).context("cannot set up logging")?;
            warn!("file logging disabled: {e}");
            Ok(None)
        }
    }
}

/// Print the error chain, plus the HTTP status when the server sent one.
fn report_error(err: &anyhow::Error) {
    eprintln!("{} {err:#}", style("error:").red().bold());
    if let Some(status) = http_status(err) {
        eprintln!("  HTTP status: {status}");
    }
}

fn http_status(err: &anyhow::Error) -> Option<u16> {
    err.downcast_ref::<BhError>().and_then(BhError::status)
}
