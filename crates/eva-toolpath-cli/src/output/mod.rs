//! Output formatting for CLI results.

pub mod json;
pub mod table;

pub use json::JsonOutput;
pub use table::TableOutput;

use std::path::{Path, PathBuf};

use eva_toolpath_core::backup::WipeReport;
use eva_toolpath_core::types::{LocalToolpathInfo, ToolpathSummary};

/// Output formatter trait
pub trait OutputFormatter {
    /// Format the robot's toolpath catalog
    fn format_remote_toolpaths(&self, toolpaths: &[ToolpathSummary]) -> String;

    /// Format the toolpath files in a backup directory
    fn format_local_toolpaths(&self, dir: &Path, toolpaths: &[LocalToolpathInfo]) -> String;

    /// Format the files written by a backup
    fn format_backup(&self, dir: &Path, files: &[PathBuf]) -> String;

    /// Format the toolpaths uploaded by a restore
    fn format_restore(&self, dir: &Path, names: &[String]) -> String;

    /// Format the result of wiping the catalog
    fn format_wipe(&self, deleted: usize) -> String;

    /// Format the result of a backup followed by a wipe
    fn format_backup_and_wipe(&self, dir: &Path, report: &WipeReport) -> String;
}

/// Get the appropriate formatter based on JSON flag
pub fn get_formatter(json: bool) -> Box<dyn OutputFormatter> {
    if json {
        Box::new(JsonOutput::new())
    } else {
        Box::new(TableOutput::new())
    }
}
