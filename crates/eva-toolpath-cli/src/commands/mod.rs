//! Command implementations.

pub mod backup;
pub mod list;
pub mod restore;
pub mod session;
pub mod wipe;

pub use backup::{run_backup, run_backup_and_wipe};
pub use list::{run_list, run_local};
pub use restore::run_restore;
pub use session::RobotOptions;
pub use wipe::run_wipe;
