//! Local storage for toolpath backups.

pub mod toolpath;

pub use toolpath::ToolpathStorage;

/// Default backup directory name for a robot: its display name lower-cased,
/// with spaces replaced by underscores.
pub fn default_dir_name(display_name: &str) -> String {
    display_name.replace(' ', "_").to_lowercase()
}
