//! Eva toolpath CLI - back up, restore and wipe the toolpaths stored on an Eva robot.
//!
//! Connection settings come from flags or the environment (`EVA_HOST`,
//! `EVA_TOKEN`, `EVA_TIMEOUT`), so the tool can run from scripts unattended.

mod cli;
mod commands;
mod error;
mod logging;
mod output;
mod progress;

use std::time::Duration;

use clap::Parser;

use cli::{Cli, Commands};
use commands::RobotOptions;
use error::{exit_codes, CliError};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.json);

    let result = run(cli).await;

    match result {
        Ok(()) => std::process::exit(exit_codes::SUCCESS),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(e.exit_code());
        }
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let robot = RobotOptions {
        host: cli.host,
        token: cli.token,
        timeout: Duration::from_millis(cli.timeout),
    };

    match cli.command {
        Commands::Backup(args) => commands::run_backup(args, &robot, cli.json).await,
        Commands::Restore(args) => commands::run_restore(args, &robot, cli.json).await,
        Commands::Wipe => commands::run_wipe(&robot, cli.json).await,
        Commands::BackupAndWipe(args) => {
            commands::run_backup_and_wipe(args, &robot, cli.json).await
        }
        Commands::List => commands::run_list(&robot, cli.json).await,
        Commands::Local(args) => commands::run_local(args, &robot, cli.json).await,
    }
}
