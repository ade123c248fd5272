//! Listing commands for the robot catalog and local backups.

use std::path::PathBuf;

use eva_toolpath_core::storage::{default_dir_name, ToolpathStorage};
use eva_toolpath_core::EvaApi;

use crate::cli::DirArgs;
use crate::commands::session::{close, RobotOptions};
use crate::error::CliError;
use crate::output::get_formatter;

/// Run the list command
pub async fn run_list(robot: &RobotOptions, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);
    let client = robot.connect().await?;

    let result = client.toolpaths_list().await;
    close(&client).await;

    println!("{}", formatter.format_remote_toolpaths(&result?));

    Ok(())
}

/// Run the local command. Only contacts the robot when no directory is given.
pub async fn run_local(args: DirArgs, robot: &RobotOptions, json: bool) -> Result<(), CliError> {
    let formatter = get_formatter(json);

    let dir = match args.dir {
        Some(dir) => dir,
        None => {
            let client = robot.connect().await?;
            let name = client.name().await;
            close(&client).await;
            PathBuf::from(default_dir_name(&name?))
        }
    };

    let storage = ToolpathStorage::new(&dir);
    let toolpaths = storage.list().await?;
    println!("{}", formatter.format_local_toolpaths(&dir, &toolpaths));

    Ok(())
}
