//! In-memory job registry
//!
//! One map from file name to [`JobRecord`] behind a single mutex. Entries are
//! never removed once a job has been accepted, so the map grows for the life
//! of the process. Nothing is persisted.

use chrono::Utc;
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::HashMap;
use tokio::sync::watch;

use crate::types::{JobRecord, JobStatus};

/// Counts per status
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RegistryStats {
    pub total_jobs: usize,
    pub received: usize,
    pub processing: usize,
    pub completed: usize,
    pub failed: usize,
}

/// Shared status/result store keyed by file name
pub struct JobRegistry {
    jobs: Mutex<HashMap<String, JobRecord>>,
    /// Bumped after every write so waiters can re-check
    changes: watch::Sender<u64>,
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl JobRegistry {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            jobs: Mutex::new(HashMap::new()),
            changes,
        }
    }

    /// Start a fresh job for `filename`, replacing any earlier job of the
    /// same name.
    pub fn register(&self, filename: &str, channel_number: i32) {
        let record = JobRecord::new(filename, JobStatus::Received, channel_number);
        self.jobs.lock().insert(filename.to_string(), record);
        self.notify();
    }

    pub fn set_status(&self, filename: &str, status: JobStatus) {
        self.update(filename, |record| record.status = status);
    }

    pub fn get_status(&self, filename: &str) -> Option<JobStatus> {
        self.jobs.lock().get(filename).map(|r| r.status)
    }

    pub fn set_result(&self, filename: &str, result: impl Into<String>) {
        let result = result.into();
        self.update(filename, |record| record.result = Some(result));
    }

    /// Result of a completed job. Jobs in any other state have none.
    pub fn get_result(&self, filename: &str) -> Option<String> {
        self.jobs
            .lock()
            .get(filename)
            .filter(|r| r.status == JobStatus::Completed)
            .and_then(|r| r.result.clone())
    }

    /// Mark completed and store the result under one lock acquisition
    pub fn complete(&self, filename: &str, result: impl Into<String>) {
        let result = result.into();
        self.update(filename, |record| {
            record.status = JobStatus::Completed;
            record.result = Some(result);
        });
    }

    pub fn get(&self, filename: &str) -> Option<JobRecord> {
        self.jobs.lock().get(filename).cloned()
    }

    /// All jobs, oldest first
    pub fn list(&self) -> Vec<JobRecord> {
        let mut jobs: Vec<JobRecord> = self.jobs.lock().values().cloned().collect();
        jobs.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.filename.cmp(&b.filename))
        });
        jobs
    }

    pub fn len(&self) -> usize {
        self.jobs.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn stats(&self) -> RegistryStats {
        let jobs = self.jobs.lock();
        let mut stats = RegistryStats {
            total_jobs: jobs.len(),
            ..RegistryStats::default()
        };

        for record in jobs.values() {
            match record.status {
                JobStatus::Received => stats.received += 1,
                JobStatus::Processing => stats.processing += 1,
                JobStatus::Completed => stats.completed += 1,
                JobStatus::FixError | JobStatus::ConversionError | JobStatus::AnalysisError => {
                    stats.failed += 1
                }
            }
        }

        stats
    }

    /// Resolve once the job reaches a terminal state.
    ///
    /// Waits through the period before the job is registered, so callers
    /// should bound it with a timeout when the name may never appear.
    pub async fn wait_for_terminal(&self, filename: &str) -> Option<JobStatus> {
        // Subscribe before the first check so no write is missed
        let mut changes = self.changes.subscribe();

        loop {
            if let Some(status) = self.get_status(filename).filter(JobStatus::is_terminal) {
                return Some(status);
            }
            if changes.changed().await.is_err() {
                return self.get_status(filename);
            }
        }
    }

    /// Drop a job that was registered but could not be queued
    pub(crate) fn withdraw(&self, filename: &str) {
        self.jobs.lock().remove(filename);
        self.notify();
    }

    fn update(&self, filename: &str, apply: impl FnOnce(&mut JobRecord)) {
        {
            let mut jobs = self.jobs.lock();
            let record = jobs
                .entry(filename.to_string())
                .or_insert_with(|| JobRecord::new(filename, JobStatus::Received, 0));
            apply(record);
            record.updated_at = Utc::now();
        }
        self.notify();
    }

    fn notify(&self) {
        self.changes.send_modify(|version| *version = version.wrapping_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    #[test]
    fn test_unknown_file_is_not_found() {
        let registry = JobRegistry::new();
        assert!(registry.get_status("missing.rec").is_none());
        assert!(registry.get_result("missing.rec").is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_result_hidden_until_completed() {
        let registry = JobRegistry::new();
        registry.register("a.rec", 0);
        registry.set_result("a.rec", "early");
        assert_eq!(registry.get_status("a.rec"), Some(JobStatus::Received));
        assert!(registry.get_result("a.rec").is_none());

        registry.set_status("a.rec", JobStatus::Processing);
        assert!(registry.get_result("a.rec").is_none());

        registry.complete("a.rec", "Mean: 1.5");
        assert_eq!(registry.get_status("a.rec"), Some(JobStatus::Completed));
        assert_eq!(registry.get_result("a.rec").as_deref(), Some("Mean: 1.5"));
    }

    #[test]
    fn test_reregister_resets_job() {
        let registry = JobRegistry::new();
        registry.register("a.rec", 1);
        registry.complete("a.rec", "old");

        registry.register("a.rec", 2);
        let record = registry.get("a.rec").unwrap();
        assert_eq!(record.status, JobStatus::Received);
        assert_eq!(record.channel_number, 2);
        assert!(record.result.is_none());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_stats_and_listing() {
        let registry = JobRegistry::new();
        registry.register("a.rec", 0);
        registry.register("b.rec", 0);
        registry.register("c.rec", 0);
        registry.register("d.rec", 0);
        registry.set_status("b.rec", JobStatus::Processing);
        registry.set_status("c.rec", JobStatus::FixError);
        registry.complete("d.rec", "ok");

        let stats = registry.stats();
        assert_eq!(
            stats,
            RegistryStats {
                total_jobs: 4,
                received: 1,
                processing: 1,
                completed: 1,
                failed: 1,
            }
        );

        let names: Vec<_> = registry.list().into_iter().map(|r| r.filename).collect();
        assert_eq!(names.len(), 4);
        assert!(names.contains(&"c.rec".to_string()));
    }

    #[test]
    fn test_withdraw_removes_entry() {
        let registry = JobRegistry::new();
        registry.register("a.rec", 0);
        registry.withdraw("a.rec");
        assert!(registry.get_status("a.rec").is_none());
    }

    #[tokio::test]
    async fn test_wait_for_terminal_wakes_on_update() {
        let registry = Arc::new(JobRegistry::new());
        registry.register("a.rec", 0);

        let waiter = {
            let registry = registry.clone();
            tokio::spawn(async move { registry.wait_for_terminal("a.rec").await })
        };

        tokio::task::yield_now().await;
        registry.set_status("a.rec", JobStatus::Processing);
        registry.set_status("a.rec", JobStatus::ConversionError);

        let status = tokio::time::timeout(Duration::from_secs(5), waiter)
            .await
            .expect("waiter timed out")
            .unwrap();
        assert_eq!(status, Some(JobStatus::ConversionError));
    }

    #[test]
    fn test_wait_for_terminal_returns_immediately_when_done() {
        let registry = JobRegistry::new();
        registry.register("a.rec", 0);
        registry.complete("a.rec", "done");

        let status = tokio_test::block_on(registry.wait_for_terminal("a.rec"));
        assert_eq!(status, Some(JobStatus::Completed));
    }
}
