//! Toolpath backup and restore.
//!
//! [`ToolpathBackupTool`] mirrors the robot's toolpath catalog into a local
//! directory and back, and can wipe the catalog once a backup exists. Every
//! step is a sequential call against the injected [`EvaApi`]; a failure aborts
//! the remaining steps and leaves completed ones in place.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::api::{with_control_lock, EvaApi};
use crate::error::{Result, RobotError};
use crate::storage::{default_dir_name, ToolpathStorage};

/// Receives per-toolpath progress while an operation runs.
///
/// The CLI drives an `indicatif` bar from this; library users can ignore it.
pub trait BackupProgress: Send + Sync {
    fn on_start(&self, operation: &str, total: usize);
    fn on_item(&self, name: &str);
    fn on_finish(&self);
}

/// No-op progress handler for when progress tracking isn't needed.
pub struct NoopProgress;

impl BackupProgress for NoopProgress {
    fn on_start(&self, _operation: &str, _total: usize) {}
    fn on_item(&self, _name: &str) {}
    fn on_finish(&self) {}
}

/// Outcome of [`ToolpathBackupTool::backup_and_wipe`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WipeReport {
    pub files: Vec<PathBuf>,
    pub deleted: usize,
}

/// Backs up, restores and wipes the toolpaths of one robot.
pub struct ToolpathBackupTool<A: EvaApi> {
    api: A,
    storage: ToolpathStorage,
    progress: Box<dyn BackupProgress>,
}

impl<A: EvaApi> ToolpathBackupTool<A> {
    /// Create a tool for `api`.
    ///
    /// Without `download_dir` the directory is named after the robot's display
    /// name (see [`default_dir_name`]), relative to the working directory.
    pub async fn new(api: A, download_dir: Option<PathBuf>) -> Result<Self> {
        let dir = match download_dir {
            Some(dir) => dir,
            None => PathBuf::from(default_dir_name(&api.name().await?)),
        };

        Ok(Self::with_dir(api, dir))
    }

    pub fn with_dir(api: A, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            api,
            storage: ToolpathStorage::new(download_dir),
            progress: Box::new(NoopProgress),
        }
    }

    pub fn with_progress(mut self, progress: impl BackupProgress + 'static) -> Self {
        self.progress = Box::new(progress);
        self
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn storage(&self) -> &ToolpathStorage {
        &self.storage
    }

    pub fn download_dir(&self) -> &Path {
        self.storage.dir()
    }

    /// Create the download directory if it does not exist.
    pub async fn ensure_download_dir(&self) -> Result<()> {
        self.storage.ensure_dir().await?;
        Ok(())
    }

    /// Only `running` counts. Fault states such as `error` do not trigger a
    /// stop; they are logged and the caller carries on.
    async fn robot_running(&self) -> Result<bool> {
        let state = self.api.control_state().await?;

        if !state.is_running() && !state.is_ready() {
            tracing::warn!(%state, "robot is neither running nor ready; not stopping it");
        }

        Ok(state.is_running())
    }

    async fn stop_robot(&self) -> Result<()> {
        tracing::info!("stopping robot");

        with_control_lock(&self.api, || self.api.control_stop_loop(true)).await?;

        let state = self.api.control_state().await?;
        if !state.is_ready() {
            return Err(RobotError::NotStopped { state }.into());
        }

        tracing::info!("robot stopped");
        Ok(())
    }

    async fn stop_if_running(&self) -> Result<()> {
        if self.robot_running().await? {
            self.stop_robot().await?;
        }
        Ok(())
    }

    /// Download every toolpath in the catalog to `<download_dir>/<name>.json`.
    ///
    /// The directory must already exist. Returns the written paths in catalog
    /// order.
    pub async fn backup(&self) -> Result<Vec<PathBuf>> {
        let stored = self.api.toolpaths_list().await?;
        tracing::info!(
            count = stored.len(),
            dir = %self.download_dir().display(),
            "backing up toolpaths"
        );

        self.progress.on_start("backup", stored.len());
        let mut written = Vec::with_capacity(stored.len());

        for summary in &stored {
            let toolpath = self.api.toolpaths_retrieve(summary.id).await?;
            let path = self.storage.save(&toolpath).await?;
            tracing::debug!(id = summary.id, path = %path.display(), "toolpath saved");

            self.progress.on_item(&toolpath.name);
            written.push(path);
        }

        self.progress.on_finish();
        Ok(written)
    }

    /// Upload every `*.json` file in the download directory, in name order.
    ///
    /// Each file creates or overwrites the remote toolpath with the same name.
    /// A bad file stops the run; toolpaths uploaded before it stay uploaded.
    pub async fn restore(&self) -> Result<Vec<String>> {
        let files = self.storage.list().await?;
        tracing::info!(
            count = files.len(),
            dir = %self.download_dir().display(),
            "restoring toolpaths"
        );

        self.progress.on_start("restore", files.len());
        let mut restored = Vec::with_capacity(files.len());

        for file in files {
            let toolpath = self.storage.read(Path::new(&file.path)).await?;
            let id = self
                .api
                .toolpaths_save(&toolpath.name, &toolpath.toolpath)
                .await?;
            tracing::debug!(name = %toolpath.name, id, "toolpath restored");

            self.progress.on_item(&toolpath.name);
            restored.push(toolpath.name);
        }

        self.progress.on_finish();
        Ok(restored)
    }

    /// Delete every toolpath on the robot, stopping it first if it is running.
    ///
    /// Returns the number of deleted toolpaths.
    pub async fn clean_toolpath_list(&self) -> Result<usize> {
        self.stop_if_running().await?;

        let stored = self.api.toolpaths_list().await?;
        tracing::info!(count = stored.len(), "deleting toolpaths");

        self.progress.on_start("wipe", stored.len());

        for summary in &stored {
            self.api.toolpaths_delete(summary.id).await?;
            tracing::debug!(id = summary.id, name = %summary.name, "toolpath deleted");
            self.progress.on_item(&summary.name);
        }

        self.progress.on_finish();
        Ok(stored.len())
    }

    /// Back up all toolpaths, then delete them from the robot.
    ///
    /// Backup files are all written before the first delete. The two steps
    /// are not atomic: toolpaths added to the robot between them are deleted
    /// without a backup.
    pub async fn backup_and_wipe(&self) -> Result<WipeReport> {
        self.stop_if_running().await?;
        self.ensure_download_dir().await?;

        let files = self.backup().await?;
        let deleted = self.clean_toolpath_list().await?;

        Ok(WipeReport { files, deleted })
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use serde_json::{json, Value};

    use super::*;
    use crate::api::fake::{Call, FakeEva};
    use crate::error::CoreError;
    use crate::types::{RobotState, Toolpath};

    fn payload(label: &str) -> Value {
        json!({
            "metadata": { "version": 2, "default_max_speed": 0.25 },
            "waypoints": [{ "label_id": 1, "joints": [0.0, 0.5, -1.0, 0.0, -1.5, 0.0] }],
            "timeline": [{ "type": "home", "waypoint_id": 0 }],
            "label": label
        })
    }

    fn robot_with(names: &[&str]) -> FakeEva {
        let eva = FakeEva::new("Eva Lab Arm");
        for name in names {
            eva.add_toolpath(name, payload(name));
        }
        eva
    }

    fn tool(eva: FakeEva, dir: &Path) -> ToolpathBackupTool<FakeEva> {
        ToolpathBackupTool::with_dir(eva, dir)
    }

    fn read_file(path: &Path) -> Value {
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
    }

    fn deletes(calls: &[Call]) -> Vec<u64> {
        calls
            .iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(*id),
                _ => None,
            })
            .collect()
    }

    fn stopped(calls: &[Call]) -> bool {
        calls
            .iter()
            .any(|c| matches!(c, Call::Lock | Call::Stop { .. } | Call::Unlock))
    }

    #[tokio::test]
    async fn test_new_derives_dir_from_robot_name() {
        let tool = ToolpathBackupTool::new(robot_with(&[]), None).await.unwrap();
        assert_eq!(tool.download_dir(), Path::new("eva_lab_arm"));

        let tool = ToolpathBackupTool::new(robot_with(&[]), Some(PathBuf::from("custom")))
            .await
            .unwrap();
        assert_eq!(tool.download_dir(), Path::new("custom"));
        assert!(!tool.api().calls().contains(&Call::Name));
    }

    #[tokio::test]
    async fn test_backup_writes_one_file_per_toolpath() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = tool(robot_with(&["pick", "place", "weld seam"]), tmp.path());

        let written = tool.backup().await.unwrap();

        assert_eq!(written.len(), 3);
        for remote in tool.api().toolpaths() {
            let path = tmp.path().join(format!("{}.json", remote.name));
            assert_eq!(read_file(&path), serde_json::to_value(&remote).unwrap());
        }
    }

    #[tokio::test]
    async fn test_backup_aborts_on_retrieve_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["pick", "place", "stack"]);
        eva.fail_retrieve(2);
        let tool = tool(eva, tmp.path());

        let err = tool.backup().await.unwrap_err();

        assert!(matches!(err, CoreError::Robot(RobotError::Http { status: 500, .. })));
        assert!(tmp.path().join("pick.json").exists());
        assert!(!tmp.path().join("place.json").exists());
        assert!(!tmp.path().join("stack.json").exists());
        assert!(!tool.api().calls().contains(&Call::Retrieve(3)));
    }

    #[tokio::test]
    async fn test_backup_then_restore_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        let source = tool(robot_with(&["A", "B"]), tmp.path());
        source.backup().await.unwrap();
        let originals: Vec<Toolpath> = source.api().toolpaths();

        let target = tool(FakeEva::new("Spare Arm"), tmp.path());
        let restored = target.restore().await.unwrap();

        assert_eq!(restored, vec!["A".to_string(), "B".to_string()]);
        let remote = target.api().toolpaths();
        assert_eq!(remote.len(), 2);
        for original in &originals {
            let copy = remote.iter().find(|t| t.name == original.name).unwrap();
            assert_eq!(copy.toolpath, original.toolpath);
        }
    }

    #[tokio::test]
    async fn test_restore_overwrites_existing_name() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ToolpathStorage::new(tmp.path());
        storage
            .save(&Toolpath::new("pick", json!({ "v": 2 })))
            .await
            .unwrap();

        let eva = FakeEva::new("Eva");
        let id = eva.add_toolpath("pick", json!({ "v": 1 }));
        let tool = tool(eva, tmp.path());

        tool.restore().await.unwrap();

        let remote = tool.api().toolpaths();
        assert_eq!(remote.len(), 1);
        assert_eq!(remote[0].extra["id"], id);
        assert_eq!(remote[0].toolpath, json!({ "v": 2 }));
    }

    #[tokio::test]
    async fn test_restore_keeps_uploads_before_bad_file() {
        let tmp = tempfile::tempdir().unwrap();
        let storage = ToolpathStorage::new(tmp.path());
        storage
            .save(&Toolpath::new("alpha", json!({ "v": 1 })))
            .await
            .unwrap();
        std::fs::write(tmp.path().join("beta.json"), "{ truncated").unwrap();
        storage
            .save(&Toolpath::new("gamma", json!({ "v": 3 })))
            .await
            .unwrap();

        let tool = tool(FakeEva::new("Eva"), tmp.path());
        let err = tool.restore().await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Storage(crate::error::StorageError::InvalidFile { .. })
        ));
        let names: Vec<_> = tool.api().toolpaths().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["alpha".to_string()]);
    }

    #[tokio::test]
    async fn test_restore_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = tool(FakeEva::new("Eva"), &tmp.path().join("absent"));

        assert!(tool.restore().await.is_err());
        assert!(tool.api().calls().is_empty());
    }

    #[tokio::test]
    async fn test_clean_deletes_every_toolpath() {
        let tmp = tempfile::tempdir().unwrap();
        let tool = tool(robot_with(&["a", "b", "c", "d"]), tmp.path());

        let deleted = tool.clean_toolpath_list().await.unwrap();

        assert_eq!(deleted, 4);
        assert!(tool.api().toolpaths().is_empty());
        let calls = tool.api().calls();
        assert_eq!(deletes(&calls), vec![1, 2, 3, 4]);
        assert!(!stopped(&calls));
    }

    #[tokio::test]
    async fn test_clean_stops_running_robot_before_deleting() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["a", "b"]);
        eva.set_state(RobotState::Running);
        let tool = tool(eva, tmp.path());

        tool.clean_toolpath_list().await.unwrap();

        assert_eq!(
            tool.api().calls(),
            vec![
                Call::State,
                Call::Lock,
                Call::Stop {
                    wait_for_ready: true
                },
                Call::Unlock,
                Call::State,
                Call::List,
                Call::Delete(1),
                Call::Delete(2),
            ]
        );
    }

    #[tokio::test]
    async fn test_clean_fails_when_robot_does_not_reach_ready() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["a", "b"]);
        eva.set_state(RobotState::Running);
        eva.set_state_after_stop(RobotState::Paused);
        let tool = tool(eva, tmp.path());

        let err = tool.clean_toolpath_list().await.unwrap_err();

        assert!(matches!(
            err,
            CoreError::Robot(RobotError::NotStopped {
                state: RobotState::Paused
            })
        ));
        assert!(deletes(&tool.api().calls()).is_empty());
        assert_eq!(tool.api().toolpaths().len(), 2);
    }

    #[tokio::test]
    async fn test_clean_unlocks_when_stop_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["a"]);
        eva.set_state(RobotState::Running);
        eva.fail_stop();
        let tool = tool(eva, tmp.path());

        assert!(tool.clean_toolpath_list().await.is_err());

        let calls = tool.api().calls();
        assert!(calls.contains(&Call::Unlock));
        assert!(deletes(&calls).is_empty());
    }

    #[tokio::test]
    async fn test_clean_does_not_stop_robot_in_fault_state() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["a"]);
        eva.set_state(RobotState::Error);
        let tool = tool(eva, tmp.path());

        assert_eq!(tool.clean_toolpath_list().await.unwrap(), 1);
        assert!(!stopped(&tool.api().calls()));
    }

    #[tokio::test]
    async fn test_backup_and_wipe_pick_and_place() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("eva_lab_arm");
        let tool = tool(robot_with(&["pick", "place"]), &dir);

        let report = tool.backup_and_wipe().await.unwrap();

        assert_eq!(report.deleted, 2);
        assert_eq!(report.files, vec![dir.join("pick.json"), dir.join("place.json")]);
        assert_eq!(read_file(&dir.join("pick.json"))["toolpath"], payload("pick"));
        assert_eq!(read_file(&dir.join("place.json"))["toolpath"], payload("place"));
        assert!(tool.api().toolpaths().is_empty());

        let calls = tool.api().calls();
        assert_eq!(deletes(&calls), vec![1, 2]);
        assert!(!stopped(&calls));

        let last_retrieve = calls
            .iter()
            .rposition(|c| matches!(c, Call::Retrieve(_)))
            .unwrap();
        let first_delete = calls
            .iter()
            .position(|c| matches!(c, Call::Delete(_)))
            .unwrap();
        assert!(last_retrieve < first_delete);
    }

    #[tokio::test]
    async fn test_backup_and_wipe_stops_running_robot_first() {
        let tmp = tempfile::tempdir().unwrap();
        let eva = robot_with(&["pick"]);
        eva.set_state(RobotState::Running);
        let tool = tool(eva, tmp.path());

        tool.backup_and_wipe().await.unwrap();

        let calls = tool.api().calls();
        let stop = calls
            .iter()
            .position(|c| matches!(c, Call::Stop { .. }))
            .unwrap();
        assert!(stop < calls.iter().position(|c| *c == Call::List).unwrap());
        assert_eq!(calls.iter().filter(|c| matches!(c, Call::Stop { .. })).count(), 1);
    }

    #[tokio::test]
    async fn test_backup_and_wipe_keeps_catalog_when_stop_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("backup");
        let eva = robot_with(&["pick"]);
        eva.set_state(RobotState::Running);
        eva.set_state_after_stop(RobotState::Error);
        let tool = tool(eva, &dir);

        let err = tool.backup_and_wipe().await.unwrap_err();

        assert!(matches!(err, CoreError::Robot(RobotError::NotStopped { .. })));
        assert!(!dir.exists());
        assert_eq!(tool.api().toolpaths().len(), 1);
    }

    #[derive(Clone, Default)]
    struct CountingProgress {
        started: Arc<AtomicUsize>,
        items: Arc<AtomicUsize>,
        finished: Arc<AtomicUsize>,
    }

    impl BackupProgress for CountingProgress {
        fn on_start(&self, _operation: &str, total: usize) {
            self.started.fetch_add(total, Ordering::SeqCst);
        }

        fn on_item(&self, _name: &str) {
            self.items.fetch_add(1, Ordering::SeqCst);
        }

        fn on_finish(&self) {
            self.finished.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[tokio::test]
    async fn test_progress_reported_per_toolpath() {
        let tmp = tempfile::tempdir().unwrap();
        let progress = CountingProgress::default();
        let tool = tool(robot_with(&["a", "b", "c"]), tmp.path()).with_progress(progress.clone());

        tool.backup_and_wipe().await.unwrap();

        assert_eq!(progress.started.load(Ordering::SeqCst), 6);
        assert_eq!(progress.items.load(Ordering::SeqCst), 6);
        assert_eq!(progress.finished.load(Ordering::SeqCst), 2);
    }
}
