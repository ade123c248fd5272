//! In-memory robot used by the unit tests.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::EvaApi;
use crate::error::{CoreError, Result, RobotError};
use crate::types::{RobotState, Toolpath, ToolpathId, ToolpathSummary};

/// Every call made against the fake, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Name,
    List,
    Retrieve(ToolpathId),
    Save(String),
    Delete(ToolpathId),
    State,
    Lock,
    Unlock,
    Stop { wait_for_ready: bool },
}

struct Inner {
    name: String,
    toolpaths: BTreeMap<ToolpathId, Toolpath>,
    next_id: ToolpathId,
    state: RobotState,
    state_after_stop: RobotState,
    fail_lock: bool,
    fail_stop: bool,
    fail_retrieve: Option<ToolpathId>,
    calls: Vec<Call>,
}

pub struct FakeEva {
    inner: Mutex<Inner>,
}

fn rejected(status: u16, message: &str) -> CoreError {
    CoreError::Robot(RobotError::Http {
        host: "fake".to_string(),
        status,
        message: message.to_string(),
    })
}

impl FakeEva {
    pub fn new(name: &str) -> Self {
        Self {
            inner: Mutex::new(Inner {
                name: name.to_string(),
                toolpaths: BTreeMap::new(),
                next_id: 1,
                state: RobotState::Ready,
                state_after_stop: RobotState::Ready,
                fail_lock: false,
                fail_stop: false,
                fail_retrieve: None,
                calls: Vec::new(),
            }),
        }
    }

    /// Add a toolpath to the remote catalog and return its id.
    pub fn add_toolpath(&self, name: &str, payload: Value) -> ToolpathId {
        let mut inner = self.inner.lock().unwrap();
        let id = inner.next_id;
        inner.next_id += 1;
        inner.toolpaths.insert(id, stored(id, name, payload));
        id
    }

    pub fn set_state(&self, state: RobotState) {
        self.inner.lock().unwrap().state = state;
    }

    pub fn set_state_after_stop(&self, state: RobotState) {
        self.inner.lock().unwrap().state_after_stop = state;
    }

    pub fn fail_lock(&self) {
        self.inner.lock().unwrap().fail_lock = true;
    }

    pub fn fail_stop(&self) {
        self.inner.lock().unwrap().fail_stop = true;
    }

    pub fn fail_retrieve(&self, id: ToolpathId) {
        self.inner.lock().unwrap().fail_retrieve = Some(id);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Remote catalog contents ordered by id.
    pub fn toolpaths(&self) -> Vec<Toolpath> {
        self.inner.lock().unwrap().toolpaths.values().cloned().collect()
    }

    fn record(&self, call: Call) {
        self.inner.lock().unwrap().calls.push(call);
    }
}

fn stored(id: ToolpathId, name: &str, payload: Value) -> Toolpath {
    let mut toolpath = Toolpath::new(name, payload);
    toolpath.extra.insert("id".to_string(), json!(id));
    toolpath
}

#[async_trait]
impl EvaApi for FakeEva {
    async fn name(&self) -> Result<String> {
        self.record(Call::Name);
        Ok(self.inner.lock().unwrap().name.clone())
    }

    async fn toolpaths_list(&self) -> Result<Vec<ToolpathSummary>> {
        self.record(Call::List);
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .toolpaths
            .iter()
            .map(|(id, toolpath)| ToolpathSummary {
                id: *id,
                name: toolpath.name.clone(),
                extra: Default::default(),
            })
            .collect())
    }

    async fn toolpaths_retrieve(&self, id: ToolpathId) -> Result<Toolpath> {
        self.record(Call::Retrieve(id));
        let inner = self.inner.lock().unwrap();
        if inner.fail_retrieve == Some(id) {
            return Err(rejected(500, "retrieve failed"));
        }
        inner
            .toolpaths
            .get(&id)
            .cloned()
            .ok_or_else(|| rejected(404, "toolpath not found"))
    }

    async fn toolpaths_save(&self, name: &str, toolpath: &Value) -> Result<ToolpathId> {
        self.record(Call::Save(name.to_string()));
        let mut inner = self.inner.lock().unwrap();
        let existing = inner
            .toolpaths
            .iter()
            .find(|(_, t)| t.name == name)
            .map(|(id, _)| *id);
        let id = match existing {
            Some(id) => id,
            None => {
                let id = inner.next_id;
                inner.next_id += 1;
                id
            }
        };
        inner.toolpaths.insert(id, stored(id, name, toolpath.clone()));
        Ok(id)
    }

    async fn toolpaths_delete(&self, id: ToolpathId) -> Result<()> {
        self.record(Call::Delete(id));
        let mut inner = self.inner.lock().unwrap();
        inner
            .toolpaths
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| rejected(404, "toolpath not found"))
    }

    async fn control_state(&self) -> Result<RobotState> {
        self.record(Call::State);
        Ok(self.inner.lock().unwrap().state)
    }

    async fn lock(&self) -> Result<()> {
        self.record(Call::Lock);
        if self.inner.lock().unwrap().fail_lock {
            return Err(rejected(409, "locked by another session"));
        }
        Ok(())
    }

    async fn unlock(&self) -> Result<()> {
        self.record(Call::Unlock);
        Ok(())
    }

    async fn control_stop_loop(&self, wait_for_ready: bool) -> Result<()> {
        self.record(Call::Stop { wait_for_ready });
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_stop {
            return Err(rejected(500, "stop failed"));
        }
        inner.state = inner.state_after_stop;
        Ok(())
    }
}
