use clap::{Parser, Subcommand};
use env_logger::Env;
use pop::commands::*;
use pop::core::{deps::Deps, error::Result, print_error};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pop")]
#[command(about = "Resolve configured projects, worktrees and tmux sessions for a picker")]
#[command(version = "0.1.0")]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    /// Use this config file instead of the default location
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List destinations, least recently used first
    List {
        /// Print the records as JSON
        #[arg(long)]
        json: bool,
        /// Do not query tmux for live sessions
        #[arg(long)]
        no_sessions: bool,
    },
    /// Print the resolved project directories
    Paths,
    /// Record a visit to a directory
    Record {
        /// Directory that was opened
        path: PathBuf,
    },
    /// Remove a directory from the access history
    Reset {
        /// Directory to forget
        path: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();

    // RUST_LOG still wins over the flag
    let level = if cli.debug { "debug" } else { "warn" };
    env_logger::Builder::from_env(Env::default().default_filter_or(level)).init();

    if let Err(e) = run(cli) {
        print_error(&e.to_string());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let deps = Deps::real();

    match cli.command {
        Commands::List { json, no_sessions } => {
            execute_list(&deps, cli.config, ListOptions { json, no_sessions })
        }
        Commands::Paths => execute_paths(&deps, cli.config),
        Commands::Record { path } => execute_record(&deps, &path),
        Commands::Reset { path } => execute_reset(&deps, &path),
    }
}
