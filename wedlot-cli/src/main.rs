mod commands;
mod config;

use clap::{Parser, Subcommand};
use config::CliConfig;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wedlot_core::{Announcer, WedlotError};
use wedlot_draw::DrawError;

#[derive(Parser)]
#[command(name = "wedlot")]
#[command(about = "Wedding lottery - draw two winners at a time")]
#[command(version)]
struct Cli {
    /// Data directory for the name pool and winner history
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <data-dir>/config.json)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Keep everything in memory for this run
    #[arg(long, global = true)]
    memory: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Draw two winners and announce them
    Draw {
        /// Skip the spinning preview
        #[arg(long)]
        no_spin: bool,
        /// Do not speak the result
        #[arg(long)]
        silent: bool,
    },

    /// Name pool commands
    #[command(subcommand)]
    Names(commands::NamesCommands),

    /// Winner history commands
    #[command(subcommand)]
    Winners(commands::WinnersCommands),

    /// Speak the announcement for one or two names
    Announce {
        #[arg(required = true, num_args = 1..=2)]
        names: Vec<String>,
    },

    /// Run the HTTP API
    Serve {
        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
        /// Also speak each server-side draw on this machine
        #[arg(long)]
        announce: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(format!(
            "wedlot_cli={0},wedlot_core={0},wedlot_draw={0},wedlot_server={0},tower_http={0}",
            log_level
        )))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let defaults = CliConfig::default();
    let cli_config = CliConfig {
        data_dir: cli.data_dir.unwrap_or(defaults.data_dir),
        config_path: cli.config,
        memory: cli.memory,
        verbose: cli.verbose,
    };

    if !cli_config.memory {
        tokio::fs::create_dir_all(&cli_config.data_dir).await?;
    }

    let app_config = match cli_config.app_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            eprintln!("Check {}", cli_config.config_path().display());
            std::process::exit(1);
        }
    };

    let session = commands::Session::open(&app_config.storage, &cli_config.data_dir).await;

    let result = match cli.command {
        Commands::Draw { no_spin, silent } => {
            let announcer = if silent {
                None
            } else {
                Some(Announcer::from_config(&app_config.speech)?)
            };
            commands::handle_draw_command(&session, announcer, !no_spin).await
        }
        Commands::Names(cmd) => commands::handle_names_command(cmd, &session).await,
        Commands::Winners(cmd) => commands::handle_winners_command(cmd, &session).await,
        Commands::Announce { names } => {
            let announcer = Announcer::from_config(&app_config.speech)?;
            commands::handle_announce_command(&announcer, &names).await
        }
        Commands::Serve { port, announce } => {
            commands::handle_serve_command(app_config, &cli_config.data_dir, port, announce).await
        }
    };

    if let Err(e) = result {
        report(&e);
        std::process::exit(1);
    }

    Ok(())
}

fn report(err: &anyhow::Error) {
    if let Some(draw_err) = err.downcast_ref::<DrawError>() {
        match draw_err {
            DrawError::EmptyPool => {
                eprintln!("Error: {}", draw_err);
                eprintln!("Add names with 'wedlot names add <name>'");
            }
            DrawError::PoolExhausted { .. } => {
                eprintln!("Error: {}", draw_err);
                eprintln!("Start a new round with 'wedlot winners reset'");
            }
            DrawError::InsufficientRemaining { .. } => {
                eprintln!("Error: {}", draw_err);
                eprintln!("Add more names or run 'wedlot winners reset'");
            }
            DrawError::Core(core) => report_core(core),
        }
        return;
    }

    match err.downcast_ref::<WedlotError>() {
        Some(core) => report_core(core),
        None => eprintln!("Error: {:#}", err),
    }
}

fn report_core(err: &WedlotError) {
    match err {
        WedlotError::DuplicateName { name } => {
            eprintln!("Error: '{}' is already in the pool", name);
        }
        WedlotError::IndexOutOfRange { index, len } => {
            eprintln!("Error: No name at position {} (the pool has {})", index + 1, len);
            eprintln!("Use 'wedlot names list' to see positions");
        }
        e if e.is_storage_failure() => {
            eprintln!("Error: {}", e);
            eprintln!("Check that the data directory is writable, or run with --memory");
        }
        e => {
            eprintln!("Error: {}", e);
        }
    }
}
