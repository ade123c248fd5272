//! JSON-formatted output for CLI.

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::json;

use super::OutputFormatter;
use eva_toolpath_core::backup::WipeReport;
use eva_toolpath_core::types::{LocalToolpathInfo, ToolpathSummary};

pub struct JsonOutput;

impl JsonOutput {
    pub fn new() -> Self {
        Self
    }

    fn to_json<T: Serialize>(value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".to_string())
    }
}

impl Default for JsonOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for JsonOutput {
    fn format_remote_toolpaths(&self, toolpaths: &[ToolpathSummary]) -> String {
        Self::to_json(&json!({
            "toolpaths": toolpaths,
            "count": toolpaths.len()
        }))
    }

    fn format_local_toolpaths(&self, dir: &Path, toolpaths: &[LocalToolpathInfo]) -> String {
        Self::to_json(&json!({
            "dir": dir,
            "toolpaths": toolpaths,
            "count": toolpaths.len()
        }))
    }

    fn format_backup(&self, dir: &Path, files: &[PathBuf]) -> String {
        Self::to_json(&json!({
            "success": true,
            "dir": dir,
            "files": files,
            "count": files.len()
        }))
    }

    fn format_restore(&self, dir: &Path, names: &[String]) -> String {
        Self::to_json(&json!({
            "success": true,
            "dir": dir,
            "restored": names,
            "count": names.len()
        }))
    }

    fn format_wipe(&self, deleted: usize) -> String {
        Self::to_json(&json!({
            "success": true,
            "deleted": deleted
        }))
    }

    fn format_backup_and_wipe(&self, dir: &Path, report: &WipeReport) -> String {
        Self::to_json(&json!({
            "success": true,
            "dir": dir,
            "files": report.files,
            "deleted": report.deleted
        }))
    }
}
