//! HTTP client for the Eva robot control API.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Response, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::sync::RwLock;

use super::response::{error_message, unwrap_envelope};
use super::EvaApi;
use crate::error::{CoreError, Result, RobotError};
use crate::types::{RobotState, Toolpath, ToolpathId, ToolpathSummary};

const API_PREFIX: &str = "/api/v1";

/// Interval between state polls while waiting for the robot to become ready.
const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

#[derive(Debug, Deserialize)]
struct CreatedToolpath {
    id: ToolpathId,
}

/// Authenticated session against one robot.
///
/// The API token is exchanged for a session token on first use; an expired
/// session (HTTP 401) is renewed once and the request replayed.
pub struct EvaClient {
    client: Client,
    host: String,
    base_url: String,
    token: String,
    session: RwLock<Option<String>>,
    wait_timeout: Duration,
    poll_interval: Duration,
}

impl EvaClient {
    /// Create a client without contacting the robot.
    ///
    /// `host` is an IP/hostname or a full `http(s)://` base URL. `timeout`
    /// bounds every HTTP request and the wait for the ready state after a stop.
    pub fn new(host: &str, token: &str, timeout: Duration) -> Result<Self> {
        let base_url = if host.starts_with("http://") || host.starts_with("https://") {
            host.trim_end_matches('/').to_string()
        } else {
            format!("http://{}", host.trim_end_matches('/'))
        };

        Ok(Self {
            client: build_client(timeout)?,
            host: host.to_string(),
            base_url,
            token: token.to_string(),
            session: RwLock::new(None),
            wait_timeout: timeout,
            poll_interval: READY_POLL_INTERVAL,
        })
    }

    /// Create a client and open a session.
    pub async fn connect(host: &str, token: &str, timeout: Duration) -> Result<Self> {
        let client = Self::new(host, token, timeout)?;
        client.authenticate().await?;
        tracing::info!(host = %client.host, "connected to robot");
        Ok(client)
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    /// Exchange the API token for a session token.
    pub async fn authenticate(&self) -> Result<()> {
        let response = self
            .client
            .post(self.url("/auth"))
            .json(&json!({ "token": self.token }))
            .send()
            .await
            .map_err(|e| self.transport(e))?;

        let body = self.check(response).await?;
        let session: String = unwrap_envelope(&body, "token", &self.host)?;
        *self.session.write().await = Some(session);

        Ok(())
    }

    /// End the current session, if any.
    pub async fn invalidate_session(&self) -> Result<()> {
        let session = self.session.write().await.take();

        if let Some(session) = session {
            let response = self
                .client
                .delete(self.url("/auth"))
                .bearer_auth(session)
                .send()
                .await
                .map_err(|e| self.transport(e))?;
            self.check(response).await?;
        }

        Ok(())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn transport(&self, e: reqwest::Error) -> CoreError {
        CoreError::Robot(RobotError::RequestFailed {
            host: self.host.clone(),
            message: e.to_string(),
        })
    }

    async fn check(&self, response: Response) -> Result<String> {
        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport(e))?;

        if !status.is_success() {
            return Err(CoreError::Robot(RobotError::Http {
                host: self.host.clone(),
                status: status.as_u16(),
                message: error_message(&body),
            }));
        }

        Ok(body)
    }

    async fn dispatch(&self, method: Method, path: &str, body: Option<&Value>) -> Result<Response> {
        if self.session.read().await.is_none() {
            self.authenticate().await?;
        }
        let session = self.session.read().await.clone().unwrap_or_default();

        let url = self.url(path);
        tracing::debug!(%method, %url, "robot request");

        let mut request = self.client.request(method, &url).bearer_auth(session);
        if let Some(body) = body {
            request = request.json(body);
        }

        request.send().await.map_err(|e| self.transport(e))
    }

    /// Send an authenticated request and return the body of a 2xx response.
    async fn send(&self, method: Method, path: &str, body: Option<&Value>) -> Result<String> {
        let response = self.dispatch(method.clone(), path, body).await?;

        let response = if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(host = %self.host, "session rejected, re-authenticating");
            self.authenticate().await?;
            self.dispatch(method, path, body).await?
        } else {
            response
        };

        self.check(response).await
    }

    /// Fetch one top-level property of the robot's data snapshot.
    pub async fn data_snapshot_property(&self, property: &str) -> Result<Value> {
        let body = self.send(Method::GET, "/data/snapshot", None).await?;
        let mut snapshot: Value = unwrap_envelope(&body, "snapshot", &self.host)?;

        snapshot
            .get_mut(property)
            .map(Value::take)
            .ok_or_else(|| {
                CoreError::Robot(RobotError::InvalidResponse {
                    host: self.host.clone(),
                    message: format!("Snapshot has no '{}' property", property),
                })
            })
    }

    async fn wait_for_ready(&self) -> Result<()> {
        let started = Instant::now();

        loop {
            tokio::time::sleep(self.poll_interval).await;

            match self.control_state().await? {
                RobotState::Ready => return Ok(()),
                RobotState::Error => {
                    return Err(CoreError::Robot(RobotError::NotStopped {
                        state: RobotState::Error,
                    }))
                }
                state => tracing::trace!(%state, "waiting for ready state"),
            }

            if started.elapsed() >= self.wait_timeout {
                return Err(CoreError::Robot(RobotError::WaitTimeout {
                    waited_ms: started.elapsed().as_millis() as u64,
                }));
            }
        }
    }
}

fn build_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .timeout(timeout)
        .build()
        .map_err(|e| CoreError::Other(format!("HTTP client error: {}", e)))
}

#[async_trait]
impl EvaApi for EvaClient {
    async fn name(&self) -> Result<String> {
        let body = self.send(Method::GET, "/name", None).await?;
        Ok(unwrap_envelope(&body, "name", &self.host)?)
    }

    async fn toolpaths_list(&self) -> Result<Vec<ToolpathSummary>> {
        let body = self.send(Method::GET, "/toolpaths", None).await?;
        Ok(unwrap_envelope(&body, "toolpaths", &self.host)?)
    }

    async fn toolpaths_retrieve(&self, id: ToolpathId) -> Result<Toolpath> {
        let body = self
            .send(Method::GET, &format!("/toolpaths/{}", id), None)
            .await?;
        Ok(unwrap_envelope(&body, "toolpath", &self.host)?)
    }

    async fn toolpaths_save(&self, name: &str, toolpath: &Value) -> Result<ToolpathId> {
        let existing = self
            .toolpaths_list()
            .await?
            .into_iter()
            .find(|summary| summary.name == name);

        let payload = json!({ "name": name, "toolpath": toolpath });

        match existing {
            Some(summary) => {
                tracing::debug!(name, id = summary.id, "updating existing toolpath");
                self.send(
                    Method::PUT,
                    &format!("/toolpaths/{}", summary.id),
                    Some(&payload),
                )
                .await?;
                Ok(summary.id)
            }
            None => {
                let body = self
                    .send(Method::POST, "/toolpaths", Some(&payload))
                    .await?;
                let created: CreatedToolpath = unwrap_envelope(&body, "toolpath", &self.host)?;
                Ok(created.id)
            }
        }
    }

    async fn toolpaths_delete(&self, id: ToolpathId) -> Result<()> {
        self.send(Method::DELETE, &format!("/toolpaths/{}", id), None)
            .await?;
        Ok(())
    }

    async fn control_state(&self) -> Result<RobotState> {
        let control = self.data_snapshot_property("control").await?;
        let state = control.get("state").cloned().ok_or_else(|| {
            CoreError::Robot(RobotError::InvalidResponse {
                host: self.host.clone(),
                message: "Control snapshot has no 'state'".to_string(),
            })
        })?;

        serde_json::from_value(state).map_err(|e| {
            CoreError::Robot(RobotError::InvalidResponse {
                host: self.host.clone(),
                message: format!("Unexpected control state: {}", e),
            })
        })
    }

    async fn lock(&self) -> Result<()> {
        self.send(Method::POST, "/controls/lock", None).await?;
        Ok(())
    }

    async fn unlock(&self) -> Result<()> {
        self.send(Method::DELETE, "/controls/lock", None).await?;
        Ok(())
    }

    async fn control_stop_loop(&self, wait_for_ready: bool) -> Result<()> {
        self.send(Method::POST, "/controls/stop_loop", None).await?;

        if wait_for_ready {
            self.wait_for_ready().await?;
        }

        Ok(())
    }
}
