//! Wipe command.

use crate::commands::session::{close, RobotOptions};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the wipe command
pub async fn run_wipe(robot: &RobotOptions, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    // The backup directory is never touched, so skip the name lookup.
    let tool = robot.open_tool(Some(".".into()), json).await?;

    let result = tool.clean_toolpath_list().await;
    close(tool.api()).await;

    println!("{}", formatter.format_wipe(result?));

    Ok(())
}
