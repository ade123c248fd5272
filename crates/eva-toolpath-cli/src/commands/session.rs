//! Robot session setup shared by the commands.

use std::path::PathBuf;
use std::time::Duration;

use eva_toolpath_core::{EvaClient, ToolpathBackupTool};

use crate::error::CliError;
use crate::progress::CliProgress;

/// Connection settings taken from the global flags.
#[derive(Debug, Clone)]
pub struct RobotOptions {
    pub host: Option<String>,
    pub token: Option<String>,
    pub timeout: Duration,
}

impl RobotOptions {
    fn require(&self) -> Result<(&str, &str), CliError> {
        let host = self
            .host
            .as_deref()
            .filter(|h| !h.trim().is_empty())
            .ok_or_else(|| CliError::InvalidArgument("--host (or EVA_HOST) is required".to_string()))?;

        let token = self
            .token
            .as_deref()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| {
                CliError::InvalidArgument("--token (or EVA_TOKEN) is required".to_string())
            })?;

        Ok((host, token))
    }

    /// Open an authenticated session with the robot.
    pub async fn connect(&self) -> Result<EvaClient, CliError> {
        let (host, token) = self.require()?;
        Ok(EvaClient::connect(host, token, self.timeout).await?)
    }

    /// Connect and build a backup tool over `dir` (or the robot's default directory).
    pub async fn open_tool(
        &self,
        dir: Option<PathBuf>,
        json: bool,
    ) -> Result<ToolpathBackupTool<EvaClient>, CliError> {
        let client = self.connect().await?;
        let tool = ToolpathBackupTool::new(client, dir).await?;

        if json {
            Ok(tool)
        } else {
            Ok(tool.with_progress(CliProgress::new()))
        }
    }
}

/// End the robot session. Failures are logged, never returned.
pub async fn close(client: &EvaClient) {
    if let Err(e) = client.invalidate_session().await {
        tracing::warn!(host = client.host(), error = %e, "failed to end robot session");
    }
}
