//! Robot control API.
//!
//! [`EvaApi`] is the capability the backup controller depends on. [`EvaClient`]
//! implements it over the robot's HTTP API; tests substitute an in-memory double.

pub mod client;
pub mod response;

#[cfg(test)]
pub(crate) mod fake;

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;
use crate::types::{RobotState, Toolpath, ToolpathId, ToolpathSummary};

pub use client::EvaClient;

/// Operations the backup tool needs from a connected robot session.
#[async_trait]
pub trait EvaApi: Send + Sync {
    /// Display name of the robot.
    async fn name(&self) -> Result<String>;

    async fn toolpaths_list(&self) -> Result<Vec<ToolpathSummary>>;

    async fn toolpaths_retrieve(&self, id: ToolpathId) -> Result<Toolpath>;

    /// Create the toolpath, or overwrite the existing entry with the same name.
    async fn toolpaths_save(&self, name: &str, toolpath: &Value) -> Result<ToolpathId>;

    async fn toolpaths_delete(&self, id: ToolpathId) -> Result<()>;

    /// Current control state from the robot's data snapshot.
    async fn control_state(&self) -> Result<RobotState>;

    /// Acquire the exclusive control lock.
    async fn lock(&self) -> Result<()>;

    /// Release the exclusive control lock.
    async fn unlock(&self) -> Result<()>;

    /// Stop the motion loop. Requires the control lock.
    async fn control_stop_loop(&self, wait_for_ready: bool) -> Result<()>;
}

/// Run `op` while holding the robot's control lock.
///
/// The lock is released whether or not `op` succeeds. When both `op` and the
/// release fail, the error from `op` is returned.
pub async fn with_control_lock<A, F, Fut, T>(api: &A, op: F) -> Result<T>
where
    A: EvaApi + ?Sized,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    api.lock().await?;
    tracing::debug!("control lock acquired");

    let result = op().await;
    let released = api.unlock().await;

    match (result, released) {
        (Ok(value), Ok(())) => {
            tracing::debug!("control lock released");
            Ok(value)
        }
        (Ok(_), Err(e)) => Err(e),
        (Err(e), Ok(())) => Err(e),
        (Err(e), Err(unlock_err)) => {
            tracing::warn!(error = %unlock_err, "failed to release control lock");
            Err(e)
        }
    }
}
