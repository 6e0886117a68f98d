//! Workflow-engine client abstraction.

use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, warn};

use crate::job::{Variables, WorkItem};

/// Client-side failure talking to the work-distribution system.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ClientError {
    #[error("workflow engine unavailable: {0}")]
    Unavailable(String),

    #[error("job activation failed for type '{job_type}': {message}")]
    Activation { job_type: String, message: String },

    #[error("acknowledgement failed for job {key}: {message}")]
    Acknowledge { key: i64, message: String },
}

/// Connection to the external work-distribution system.
///
/// Implementations must be thread-safe: the dispatcher shares one client
/// across every job-type poller.
pub trait WorkflowClient: Send + Sync {
    /// Request up to `max_jobs` pending jobs of the given type, activating
    /// them with a server-side timeout.
    fn activate_jobs(
        &self,
        job_type: &str,
        max_jobs: usize,
        timeout: Duration,
    ) -> Result<Vec<WorkItem>, ClientError>;

    /// Acknowledge successful completion with the handler's result payload.
    fn complete_job(&self, key: i64, variables: Variables) -> Result<(), ClientError>;

    /// Acknowledge failure, handing back the decremented retry budget and
    /// the error message.
    fn fail_job(
        &self,
        key: i64,
        remaining_retries: i32,
        error_message: &str,
    ) -> Result<(), ClientError>;

    /// Lightweight connectivity probe.
    fn probe(&self) -> Result<(), ClientError>;
}

/// Cached connection state: an atomic connected flag plus a last-error slot.
///
/// Single writer per check, safe for concurrent reads.
#[derive(Debug, Default)]
pub struct ConnectionMonitor {
    connected: AtomicBool,
    last_error: Mutex<Option<String>>,
}

impl ConnectionMonitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Probe the client and refresh the cached state.
    pub fn check(&self, client: &dyn WorkflowClient) -> bool {
        match client.probe() {
            Ok(()) => {
                self.connected.store(true, Ordering::SeqCst);
                *self.last_error.lock().unwrap() = None;
                debug!("workflow engine connection check: success");
                true
            }
            Err(e) => {
                self.connected.store(false, Ordering::SeqCst);
                *self.last_error.lock().unwrap() = Some(e.to_string());
                warn!(error = %e, "workflow engine connection check: failed");
                false
            }
        }
    }

    /// The cached result of the most recent probe.
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    pub fn last_error(&self) -> Option<String> {
        self.last_error.lock().unwrap().clone()
    }
}
