//! CLI argument definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Eva toolpath backup - download, restore and wipe robot toolpaths
#[derive(Parser, Debug)]
#[command(name = "eva-toolpaths")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Robot IP address, hostname or base URL
    #[arg(long, global = true, env = "EVA_HOST")]
    pub host: Option<String>,

    /// Robot API token
    #[arg(long, global = true, env = "EVA_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Request timeout in milliseconds (also bounds the wait for the robot to stop)
    #[arg(long, global = true, default_value = "30000", env = "EVA_TIMEOUT")]
    pub timeout: u64,

    /// Verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Download every toolpath on the robot to local JSON files
    Backup(DirArgs),

    /// Upload every local toolpath file to the robot
    Restore(DirArgs),

    /// Delete every toolpath on the robot, stopping it first if running
    Wipe,

    /// Back up every toolpath, then delete them all from the robot
    BackupAndWipe(DirArgs),

    /// List toolpaths stored on the robot
    List,

    /// List toolpath files in a local backup directory
    Local(DirArgs),
}

#[derive(Args, Debug)]
pub struct DirArgs {
    /// Backup directory (default: the robot's name, lower-cased, spaces as underscores)
    #[arg(short, long)]
    pub dir: Option<PathBuf>,
}
