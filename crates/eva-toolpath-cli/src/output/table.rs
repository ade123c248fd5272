//! Table-formatted output for CLI.

use std::path::{Path, PathBuf};

use colored::*;
use comfy_table::{Cell, ContentArrangement, Table};

use super::OutputFormatter;
use eva_toolpath_core::backup::WipeReport;
use eva_toolpath_core::types::{LocalToolpathInfo, ToolpathSummary};

pub struct TableOutput;

impl TableOutput {
    pub fn new() -> Self {
        Self
    }

    /// Render an RFC 3339 timestamp in local time, or pass it through unchanged.
    fn local_time(timestamp: &str) -> String {
        chrono::DateTime::parse_from_rfc3339(timestamp)
            .map(|t| {
                t.with_timezone(&chrono::Local)
                    .format("%Y-%m-%d %H:%M:%S")
                    .to_string()
            })
            .unwrap_or_else(|_| timestamp.to_string())
    }
}

impl Default for TableOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for TableOutput {
    fn format_remote_toolpaths(&self, toolpaths: &[ToolpathSummary]) -> String {
        if toolpaths.is_empty() {
            return "No toolpaths stored on the robot.".to_string();
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["ID", "Name"]);

        for toolpath in toolpaths {
            table.add_row(vec![
                Cell::new(toolpath.id.to_string()),
                Cell::new(&toolpath.name),
            ]);
        }

        format!("{}\n\n{} toolpath(s) on robot", table, toolpaths.len())
    }

    fn format_local_toolpaths(&self, dir: &Path, toolpaths: &[LocalToolpathInfo]) -> String {
        if toolpaths.is_empty() {
            return format!("No toolpath files in {}.", dir.display());
        }

        let mut table = Table::new();
        table.set_content_arrangement(ContentArrangement::Dynamic);
        table.set_header(vec!["Name", "Modified", "File"]);

        for toolpath in toolpaths {
            table.add_row(vec![
                Cell::new(&toolpath.name),
                Cell::new(Self::local_time(&toolpath.updated_at)),
                Cell::new(&toolpath.path),
            ]);
        }

        format!("{}\n\n{} file(s) in {}", table, toolpaths.len(), dir.display())
    }

    fn format_backup(&self, dir: &Path, files: &[PathBuf]) -> String {
        let mut lines = vec![format!(
            "{} Backed up {} toolpath(s) to {}",
            "[OK]".green(),
            files.len(),
            dir.display()
        )];
        lines.extend(files.iter().map(|f| format!("  - {}", f.display())));
        lines.join("\n")
    }

    fn format_restore(&self, dir: &Path, names: &[String]) -> String {
        let mut lines = vec![format!(
            "{} Restored {} toolpath(s) from {}",
            "[OK]".green(),
            names.len(),
            dir.display()
        )];
        lines.extend(names.iter().map(|n| format!("  - {}", n)));
        lines.join("\n")
    }

    fn format_wipe(&self, deleted: usize) -> String {
        format!(
            "{} Deleted {} toolpath(s) from the robot",
            "[OK]".green(),
            deleted.to_string().yellow()
        )
    }

    fn format_backup_and_wipe(&self, dir: &Path, report: &WipeReport) -> String {
        format!(
            "{}\n{}",
            self.format_backup(dir, &report.files),
            self.format_wipe(report.deleted)
        )
    }
}
