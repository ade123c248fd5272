//! Restore command.

use crate::cli::DirArgs;
use crate::commands::session::{close, RobotOptions};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the restore command
pub async fn run_restore(args: DirArgs, robot: &RobotOptions, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let tool = robot.open_tool(args.dir, json).await?;

    let result = tool.restore().await;
    close(tool.api()).await;

    let names = result?;
    println!("{}", formatter.format_restore(tool.download_dir(), &names));

    Ok(())
}
