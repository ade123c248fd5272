//! Shared core library for Eva toolpath backup and restore.
//!
//! - [`api`]: robot control capability and its HTTP client
//! - [`storage`]: local toolpath files
//! - [`backup`]: the backup / restore / wipe controller

pub mod api;
pub mod backup;
pub mod error;
pub mod storage;
pub mod types;

pub use api::{EvaApi, EvaClient};
pub use backup::{BackupProgress, NoopProgress, ToolpathBackupTool, WipeReport};
pub use error::{CoreError, Result};
