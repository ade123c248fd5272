//! Error types for the CLI.
//!
//! CliError wraps CoreError from the shared library and adds CLI-specific variants.

use eva_toolpath_core::error::CoreError;
use thiserror::Error;

pub use eva_toolpath_core::error::{RobotError, StorageError};

/// Exit codes for the CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const GENERAL_ERROR: i32 = 1;
    pub const NETWORK_ERROR: i32 = 2;
    pub const ROBOT_ERROR: i32 = 3;
    pub const INVALID_ARGS: i32 = 4;
}

/// Main error type for the CLI
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Core(#[from] CoreError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(e) => match e {
                CoreError::Robot(RobotError::RequestFailed { .. }) => exit_codes::NETWORK_ERROR,
                CoreError::Robot(RobotError::WaitTimeout { .. }) => exit_codes::NETWORK_ERROR,
                CoreError::Robot(_) => exit_codes::ROBOT_ERROR,
                CoreError::Storage(_) => exit_codes::GENERAL_ERROR,
                CoreError::Io(_) => exit_codes::GENERAL_ERROR,
                CoreError::Other(_) => exit_codes::GENERAL_ERROR,
            },
            CliError::InvalidArgument(_) => exit_codes::INVALID_ARGS,
        }
    }
}

impl From<RobotError> for CliError {
    fn from(e: RobotError) -> Self {
        CliError::Core(CoreError::Robot(e))
    }
}

impl From<StorageError> for CliError {
    fn from(e: StorageError) -> Self {
        CliError::Core(CoreError::Storage(e))
    }
}

/// Result type for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
