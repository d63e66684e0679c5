//! Main entry point for the Squad Forge roster tool
//!
//! Every organizer action is a subcommand. Each invocation loads the roster
//! (data source first, local snapshot as fallback), runs one command, and
//! persists the result.

use anyhow::Result;
use clap::{Args as ClapArgs, Parser, Subcommand};
use squad_forge::config::AppConfig;
use squad_forge::rating::compose_name;
use squad_forge::storage::{FilePlayerSource, FileSnapshotStore};
use squad_forge::types::{Outcome, PlayerId, SortKey};
use squad_forge::utils::parse_id_list;
use squad_forge::views::{PlayerView, ResultView, SessionView, TeamView};
use squad_forge::{RosterError, RosterService};
use serde::Serialize;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};

/// Squad Forge - rosters and balanced teams for pickup games
#[derive(Parser)]
#[command(
    name = "squad-forge",
    version,
    about = "Keep a roster of players, form balanced teams and track results",
    long_about = "Squad Forge stores players with skill ratings and pairwise interaction scores, \
                 splits them into balanced teams with a snake draft or by hand, and feeds match \
                 and cup results back into skills and interactions."
)]
struct Args {
    /// Configuration file path
    #[arg(
        short,
        long,
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    config: Option<PathBuf>,

    /// Log level override
    #[arg(
        short,
        long,
        value_name = "LEVEL",
        help = "Override log level (trace, debug, info, warn, error)"
    )]
    log_level: Option<String>,

    /// Data file override
    #[arg(long, value_name = "FILE", help = "Override the player data file")]
    data_file: Option<PathBuf>,

    /// Work without the data source
    #[arg(long, help = "Do not read from or write to the player data file")]
    offline: bool,

    /// Print JSON instead of text
    #[arg(long, global = true, help = "Print machine readable JSON output")]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Manage players
    #[command(subcommand)]
    Players(PlayerCommand),

    /// Form teams and record results
    #[command(subcommand)]
    Teams(TeamCommand),

    /// Push the roster to the data source
    Sync,

    /// Show where data comes from and what is formed
    Status,
}

#[derive(Subcommand)]
enum PlayerCommand {
    /// List players
    List {
        #[arg(long, default_value = "name", help = "Sort by name or skill")]
        sort: SortKey,
    },
    /// Show a player profile with best partners
    Show { id: PlayerId },
    /// Add a new player
    Add(AddArgs),
    /// Change a player's name and skill
    Edit {
        id: PlayerId,
        #[arg(long)]
        name: String,
        #[arg(long)]
        skill: String,
    },
    /// Delete a player
    Delete {
        id: PlayerId,
        #[arg(short, long, help = "Skip the confirmation prompt")]
        yes: bool,
    },
}

#[derive(ClapArgs)]
struct AddArgs {
    #[arg(long)]
    last: String,
    #[arg(long)]
    first: String,
    #[arg(long)]
    middle: Option<String>,
    #[arg(long, help = "Skill between 0.1 and 1.0")]
    skill: String,
}

#[derive(Subcommand)]
enum TeamCommand {
    /// Balance selected players into teams
    Auto {
        #[arg(long, help = "Number of teams (2-10)")]
        count: usize,
        #[arg(long, conflicts_with = "players", help = "Use every rostered player")]
        all: bool,
        #[arg(long, value_name = "IDS", help = "Comma separated player ids")]
        players: Option<String>,
    },
    /// Start placing players by hand
    Manual {
        #[arg(long, help = "Number of teams (2-10)")]
        count: usize,
    },
    /// Place a player on a team (teams are numbered from 1)
    Place { player: PlayerId, team: usize },
    /// Show the current teams
    Show,
    /// List players not yet placed on a team
    Available,
    /// Discard the current teams
    Reset,
    /// Record a match and/or cup result for a team
    Record {
        team: usize,
        #[arg(long = "match", value_name = "win|loss")]
        match_outcome: Option<Outcome>,
        #[arg(long = "cup", value_name = "win|loss")]
        cup_outcome: Option<Outcome>,
    },
}

/// Initialize structured logging with the configured level
fn init_logging(log_level: &str) -> Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.into()),
        )
        .with_target(false)
        .with_writer(io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    Ok(())
}

/// Load and merge configuration from environment, file and CLI arguments
fn load_config(args: &Args) -> Result<AppConfig> {
    let mut config = match &args.config {
        Some(path) => AppConfig::from_file(path)?,
        None => AppConfig::from_env()?,
    };

    if let Some(log_level) = &args.log_level {
        config.service.log_level = log_level.clone();
    }
    if let Some(data_file) = &args.data_file {
        config.storage.data_file = data_file.clone();
    }
    if args.offline {
        config.storage.offline = true;
    }

    squad_forge::config::validate_config(&config)?;
    Ok(config)
}

/// Convert a 1-based team number to an index
fn team_index(number: usize) -> Result<usize> {
    number
        .checked_sub(1)
        .ok_or_else(|| RosterError::TeamNotFound { team_index: number }.into())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

fn emit<T: Serialize + std::fmt::Display>(json: bool, value: &T) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(value)?);
    } else {
        print!("{}", value);
    }
    Ok(())
}

fn emit_players(json: bool, players: &[PlayerView]) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(players)?);
    } else if players.is_empty() {
        println!("No players");
    } else {
        for player in players {
            println!("{}", player);
        }
        println!("({} players)", players.len());
    }
    Ok(())
}

async fn run_players(service: &mut RosterService, command: PlayerCommand, json: bool) -> Result<()> {
    match command {
        PlayerCommand::List { sort } => emit_players(json, &service.list_players(sort)),
        PlayerCommand::Show { id } => emit(json, &service.profile(id)?),
        PlayerCommand::Add(add) => {
            let name = compose_name(&add.last, &add.first, add.middle.as_deref())?;
            let player = service.add_player(&name, &add.skill).await?;
            emit_players(json, &[PlayerView::from(&player)])
        }
        PlayerCommand::Edit { id, name, skill } => {
            let player = service.edit_player(id, &name, &skill).await?;
            emit_players(json, &[PlayerView::from(&player)])
        }
        PlayerCommand::Delete { id, yes } => {
            let name = service.player(id)?.name.clone();
            if !yes && !confirm(&format!("Delete player {}?", name))? {
                println!("Cancelled");
                return Ok(());
            }
            service.delete_player(id).await?;
            println!("Deleted {}", name);
            Ok(())
        }
    }
}

async fn run_teams(service: &mut RosterService, command: TeamCommand, json: bool) -> Result<()> {
    match command {
        TeamCommand::Auto {
            count,
            all,
            players,
        } => {
            let selection: Vec<PlayerId> = match (all, players) {
                (true, _) => service.roster().players().iter().map(|p| p.id).collect(),
                (false, Some(raw)) => parse_id_list(&raw).ok_or_else(|| {
                    RosterError::invalid_input(format!("invalid player id list '{}'", raw))
                })?,
                (false, None) => {
                    return Err(RosterError::invalid_input("pass --all or --players").into())
                }
            };
            let session = service.form_auto_teams(&selection, count).await?;
            emit(json, &SessionView::from(session))
        }
        TeamCommand::Manual { count } => {
            let session = service.start_manual(count).await?;
            emit(json, &SessionView::from(session))
        }
        TeamCommand::Place { player, team } => {
            let index = team_index(team)?;
            service.place_player(player, index).await?;
            let session = service.session().ok_or(RosterError::NoActiveSession)?;
            emit(json, &TeamView::new(index, session.team(index)?))
        }
        TeamCommand::Show => {
            let session = service.session().ok_or(RosterError::NoActiveSession)?;
            emit(json, &SessionView::from(session))
        }
        TeamCommand::Available => {
            let available: Vec<PlayerView> = service
                .available_players()
                .into_iter()
                .map(PlayerView::from)
                .collect();
            emit_players(json, &available)
        }
        TeamCommand::Reset => {
            service.reset_teams().await;
            println!("Teams reset");
            Ok(())
        }
        TeamCommand::Record {
            team,
            match_outcome,
            cup_outcome,
        } => {
            let index = team_index(team)?;
            let result = service
                .record_result(index, match_outcome, cup_outcome)
                .await?;
            emit(json, &ResultView::new(index, &result))
        }
    }
}

fn collaborators(config: &AppConfig) -> (Arc<FilePlayerSource>, Arc<FileSnapshotStore>) {
    (
        Arc::new(FilePlayerSource::new(&config.storage.data_file)),
        Arc::new(FileSnapshotStore::new(&config.storage.local_dir)),
    )
}

async fn open(config: AppConfig) -> RosterService {
    let (source, local) = collaborators(&config);
    RosterService::load(config, source, local).await
}

async fn run(args: Args, config: AppConfig) -> Result<()> {
    match args.command {
        Command::Players(command) => run_players(&mut open(config).await, command, args.json).await,
        Command::Teams(command) => run_teams(&mut open(config).await, command, args.json).await,
        Command::Sync => {
            let (source, local) = collaborators(&config);
            let (_, report) = RosterService::push_local(config, source, local).await;
            match report.remote_forwarded {
                Some(true) => println!("Players synced to the data source"),
                Some(false) => println!("Data source unreachable, players saved locally"),
                None => println!("Offline, players saved locally"),
            }
            Ok(())
        }
        Command::Status => emit(args.json, &open(config).await.status()),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = load_config(&args).unwrap_or_else(|e| {
        eprintln!("Configuration error: {}", e);
        std::process::exit(1);
    });

    if let Err(e) = init_logging(&config.service.log_level) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    info!(
        data_file = %config.storage.data_file.display(),
        local_dir = %config.storage.local_dir.display(),
        offline = config.storage.offline,
        "Starting {}",
        config.service.name
    );

    if let Err(e) = run(args, config).await {
        error!("Command failed: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}
