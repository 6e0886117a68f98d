//! In-memory work-distribution broker for tests/dev.
//!
//! Implements the external system's retry protocol: a failed job is
//! re-offered with its acknowledged retry budget until that budget reaches
//! zero. Completions and failures are recorded so tests can assert on the
//! acknowledgement traffic.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;

use crate::client::{ClientError, WorkflowClient};
use crate::job::{Variables, WorkItem};

/// A recorded completion acknowledgement.
#[derive(Debug, Clone)]
pub struct Completion {
    pub key: i64,
    pub variables: Variables,
}

/// A recorded failure acknowledgement.
#[derive(Debug, Clone)]
pub struct Failure {
    pub key: i64,
    pub remaining_retries: i32,
    pub error_message: String,
}

#[derive(Default)]
struct BrokerState {
    pending: HashMap<String, VecDeque<WorkItem>>,
    active: HashMap<i64, WorkItem>,
    completions: Vec<Completion>,
    failures: Vec<Failure>,
}

/// Scriptable in-memory `WorkflowClient`.
#[derive(Default)]
pub struct InMemoryBroker {
    state: Mutex<BrokerState>,
    disconnected: AtomicBool,
    next_key: AtomicI64,
}

impl InMemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Queue a job for activation; returns its assigned key.
    pub fn publish(&self, job_type: &str, variables: Variables, retries: i32) -> i64 {
        let key = self.next_key.fetch_add(1, Ordering::SeqCst) + 1;
        let job = WorkItem::new(key, job_type, variables, retries, Utc::now());
        let mut state = self.state.lock().unwrap();
        state
            .pending
            .entry(job_type.to_string())
            .or_default()
            .push_back(job);
        key
    }

    /// Simulate the engine being unreachable.
    pub fn set_disconnected(&self, disconnected: bool) {
        self.disconnected.store(disconnected, Ordering::SeqCst);
    }

    pub fn completions(&self) -> Vec<Completion> {
        self.state.lock().unwrap().completions.clone()
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.state.lock().unwrap().failures.clone()
    }

    pub fn pending_count(&self, job_type: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.pending.get(job_type).map_or(0, VecDeque::len)
    }

    fn ensure_connected(&self) -> Result<(), ClientError> {
        if self.disconnected.load(Ordering::SeqCst) {
            Err(ClientError::Unavailable("broker offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl WorkflowClient for InMemoryBroker {
    fn activate_jobs(
        &self,
        job_type: &str,
        max_jobs: usize,
        timeout: Duration,
    ) -> Result<Vec<WorkItem>, ClientError> {
        self.ensure_connected()?;

        let mut state = self.state.lock().unwrap();
        let deadline = Utc::now()
            + chrono::Duration::from_std(timeout).unwrap_or_else(|_| chrono::Duration::zero());

        let mut activated = Vec::new();
        if let Some(queue) = state.pending.get_mut(job_type) {
            while activated.len() < max_jobs {
                let Some(mut job) = queue.pop_front() else {
                    break;
                };
                job.deadline = deadline;
                activated.push(job);
            }
        }
        for job in &activated {
            state.active.insert(job.key, job.clone());
        }

        Ok(activated)
    }

    fn complete_job(&self, key: i64, variables: Variables) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let mut state = self.state.lock().unwrap();
        state.active.remove(&key);
        state.completions.push(Completion { key, variables });
        Ok(())
    }

    fn fail_job(
        &self,
        key: i64,
        remaining_retries: i32,
        error_message: &str,
    ) -> Result<(), ClientError> {
        self.ensure_connected()?;

        let mut state = self.state.lock().unwrap();
        let job = state.active.remove(&key);
        state.failures.push(Failure {
            key,
            remaining_retries,
            error_message: error_message.to_string(),
        });

        // Re-offer while the retry budget lasts.
        if remaining_retries > 0 {
            if let Some(mut job) = job {
                job.retries = remaining_retries;
                state
                    .pending
                    .entry(job.job_type.clone())
                    .or_default()
                    .push_back(job);
            }
        }

        Ok(())
    }

    fn probe(&self) -> Result<(), ClientError> {
        self.ensure_connected()
    }
}
