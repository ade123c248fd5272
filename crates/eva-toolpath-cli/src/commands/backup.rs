//! Backup commands.

use std::path::PathBuf;

use eva_toolpath_core::CoreError;

use crate::cli::DirArgs;
use crate::commands::session::{close, RobotOptions};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the backup command
pub async fn run_backup(args: DirArgs, robot: &RobotOptions, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let tool = robot.open_tool(args.dir, json).await?;

    let result: Result<Vec<PathBuf>, CoreError> = async {
        tool.ensure_download_dir().await?;
        tool.backup().await
    }
    .await;
    close(tool.api()).await;

    let files = result?;
    println!("{}", formatter.format_backup(tool.download_dir(), &files));

    Ok(())
}

/// Run the backup-and-wipe command
pub async fn run_backup_and_wipe(
    args: DirArgs,
    robot: &RobotOptions,
    json: bool,
) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let tool = robot.open_tool(args.dir, json).await?;

    let result = tool.backup_and_wipe().await;
    close(tool.api()).await;

    let report = result?;
    println!(
        "{}",
        formatter.format_backup_and_wipe(tool.download_dir(), &report)
    );

    Ok(())
}
