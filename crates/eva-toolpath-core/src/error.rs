//! Error types for the Eva toolpath core.

use thiserror::Error;

use crate::types::RobotState;

/// Core error type for shared operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Robot error: {0}")]
    Robot(#[from] RobotError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

/// Robot control API errors
#[derive(Debug, Error)]
pub enum RobotError {
    #[error("Request to {host} failed: {message}")]
    RequestFailed { host: String, message: String },

    #[error("Robot {host} returned HTTP {status}: {message}")]
    Http {
        host: String,
        status: u16,
        message: String,
    },

    #[error("Invalid response from {host}: {message}")]
    InvalidResponse { host: String, message: String },

    /// The only named domain failure: a stop request left the robot outside `ready`.
    #[error("Robot did not reach ready state (state: {state})")]
    NotStopped { state: RobotState },

    #[error("Timed out after {waited_ms}ms waiting for robot to become ready")]
    WaitTimeout { waited_ms: u64 },
}

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to access storage directory: {0}")]
    DirectoryAccess(String),

    #[error("Invalid name: {0}")]
    InvalidName(String),

    #[error("Invalid toolpath file {path}: {message}")]
    InvalidFile { path: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
