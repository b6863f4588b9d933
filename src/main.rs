use std::path::PathBuf;

use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};

use ttrpg_campaign_core::config::AppConfig;
use ttrpg_campaign_core::core::campaign::{load_campaign, load_party};
use ttrpg_campaign_core::core::combat::InitiativeBuilder;
use ttrpg_campaign_core::core::logging;
use ttrpg_campaign_core::core::rollup::{rollup, RollupScope};
use ttrpg_campaign_core::Error;

/// Inspect campaign snapshots from the command line
#[derive(Parser, Debug)]
#[command(name = "campaign-core", version)]
#[command(about = "Roll up campaign content and build initiative rosters")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Aggregate enemies, NPCs, objects, cards and rewards
    Rollup {
        /// Campaign JSON snapshot
        campaign: PathBuf,

        /// Restrict to one adventure
        #[arg(long)]
        adventure: Option<String>,

        /// Restrict to one session (requires --adventure)
        #[arg(long, requires = "adventure")]
        session: Option<String>,
    },
    /// Build the unrolled initiative roster for an encounter
    Initiative {
        /// Campaign JSON snapshot
        campaign: PathBuf,

        #[arg(long)]
        encounter: String,

        /// Party JSON (array of characters)
        #[arg(long)]
        party: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AppConfig::load_from(path).into_diagnostic()?,
        None => AppConfig::load(),
    };

    // stdout carries the JSON result
    let _log_guard = logging::init_stderr(&config.logging).into_diagnostic()?;
    log::info!("{} v{} starting", ttrpg_campaign_core::NAME, ttrpg_campaign_core::VERSION);

    let output = run(cli.command, &config).into_diagnostic()?;
    println!("{output}");
    Ok(())
}

fn run(command: Commands, config: &AppConfig) -> ttrpg_campaign_core::Result<String> {
    match command {
        Commands::Rollup {
            campaign,
            adventure,
            session,
        } => {
            let campaign = load_campaign(&campaign)?;
            let scope = match (adventure, session) {
                (Some(adventure_id), Some(session_id)) => RollupScope::Session {
                    adventure_id,
                    session_id,
                },
                (Some(adventure_id), None) => RollupScope::Adventure { adventure_id },
                _ => RollupScope::Campaign,
            };
            let data = rollup(&campaign, &scope);
            Ok(serde_json::to_string_pretty(&data)?)
        }
        Commands::Initiative {
            campaign,
            encounter,
            party,
        } => {
            let campaign = load_campaign(&campaign)?;
            let party = match party {
                Some(path) => load_party(&path)?,
                None => Vec::new(),
            };
            let Some(found) = campaign.encounter(&encounter) else {
                return Err(Error::NotFound("encounter", encounter));
            };

            let builder = InitiativeBuilder::new(config.combat.action_budget);
            let entries = builder.build(found, &party, Some(&campaign));
            Ok(serde_json::to_string_pretty(&entries)?)
        }
    }
}
