//! Job dispatch loop.
//!
//! One independently scheduled poll loop per bound job type: ticks of the
//! same type never overlap, ticks of different types run in parallel. Each
//! tick checks connectivity, activates a bounded batch, and processes the
//! batch sequentially; each processed job is acknowledged (complete or fail
//! with a decremented retry budget) and appended to the execution ledger.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::client::{ConnectionMonitor, WorkflowClient};
use crate::handler::JobHandler;
use crate::job::WorkItem;
use crate::ledger::{ExecutionLedger, ExecutionRecord};

/// Poll-loop parameters for one job type.
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Job type tag to poll for.
    pub job_type: String,
    /// Maximum jobs to activate per tick.
    pub max_jobs: usize,
    /// Server-side activation timeout.
    pub timeout: Duration,
    /// Fixed delay between ticks.
    pub poll_delay: Duration,
}

impl PollerConfig {
    pub fn new(job_type: impl Into<String>) -> Self {
        Self {
            job_type: job_type.into(),
            max_jobs: 5,
            timeout: Duration::from_secs(60),
            poll_delay: Duration::from_secs(1),
        }
    }

    pub fn with_max_jobs(mut self, max_jobs: usize) -> Self {
        self.max_jobs = max_jobs;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_poll_delay(mut self, poll_delay: Duration) -> Self {
        self.poll_delay = poll_delay;
        self
    }
}

struct Binding {
    config: PollerConfig,
    handler: Arc<dyn JobHandler>,
}

/// Polls the work-distribution system and routes jobs to their handlers.
pub struct JobDispatcher {
    client: Arc<dyn WorkflowClient>,
    ledger: Arc<dyn ExecutionLedger>,
    monitor: Arc<ConnectionMonitor>,
    bindings: Vec<Binding>,
}

impl JobDispatcher {
    pub fn new(client: Arc<dyn WorkflowClient>, ledger: Arc<dyn ExecutionLedger>) -> Self {
        Self {
            client,
            ledger,
            monitor: Arc::new(ConnectionMonitor::new()),
            bindings: Vec::new(),
        }
    }

    /// Bind a handler to a job type.
    pub fn bind(&mut self, config: PollerConfig, handler: Arc<dyn JobHandler>) {
        self.bindings.push(Binding { config, handler });
    }

    pub fn monitor(&self) -> Arc<ConnectionMonitor> {
        self.monitor.clone()
    }

    /// Run a single tick for one job type (for testing or synchronous use).
    pub fn run_tick(&self, job_type: &str) {
        if let Some(binding) = self.bindings.iter().find(|b| b.config.job_type == job_type) {
            poll_once(
                &self.client,
                &self.ledger,
                &self.monitor,
                &binding.config,
                &binding.handler,
            );
        } else {
            warn!(job_type, "no handler bound for job type");
        }
    }

    /// Start one poll thread per bound job type.
    pub fn spawn(self) -> DispatcherHandle {
        let running = Arc::new(AtomicBool::new(true));
        let mut joins = Vec::with_capacity(self.bindings.len());

        for binding in self.bindings {
            let client = self.client.clone();
            let ledger = self.ledger.clone();
            let monitor = self.monitor.clone();
            let running = running.clone();
            let name = format!("poller-{}", binding.config.job_type);

            let join = thread::Builder::new()
                .name(name)
                .spawn(move || {
                    poller_loop(client, ledger, monitor, binding.config, binding.handler, running);
                })
                .expect("failed to spawn job poller thread");
            joins.push(join);
        }

        info!("job dispatch loops started");
        DispatcherHandle {
            running,
            joins,
            monitor: self.monitor,
        }
    }
}

/// Handle to a running dispatcher.
pub struct DispatcherHandle {
    running: Arc<AtomicBool>,
    joins: Vec<thread::JoinHandle<()>>,
    monitor: Arc<ConnectionMonitor>,
}

impl DispatcherHandle {
    /// Request a stop and wait for in-flight ticks to finish.
    ///
    /// No new ticks start after the signal; running ones complete.
    pub fn shutdown(mut self) {
        info!("stopping job dispatch loops");
        self.running.store(false, Ordering::SeqCst);
        for join in self.joins.drain(..) {
            let _ = join.join();
        }
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn monitor(&self) -> &ConnectionMonitor {
        &self.monitor
    }
}

fn poller_loop(
    client: Arc<dyn WorkflowClient>,
    ledger: Arc<dyn ExecutionLedger>,
    monitor: Arc<ConnectionMonitor>,
    config: PollerConfig,
    handler: Arc<dyn JobHandler>,
    running: Arc<AtomicBool>,
) {
    info!(job_type = %config.job_type, "job poller started");

    while running.load(Ordering::SeqCst) {
        poll_once(&client, &ledger, &monitor, &config, &handler);
        thread::sleep(config.poll_delay);
    }

    info!(job_type = %config.job_type, "job poller stopped");
}

fn poll_once(
    client: &Arc<dyn WorkflowClient>,
    ledger: &Arc<dyn ExecutionLedger>,
    monitor: &ConnectionMonitor,
    config: &PollerConfig,
    handler: &Arc<dyn JobHandler>,
) {
    if !monitor.check(client.as_ref()) {
        debug!(job_type = %config.job_type, "workflow engine not connected, skipping poll");
        return;
    }

    let jobs = match client.activate_jobs(&config.job_type, config.max_jobs, config.timeout) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!(job_type = %config.job_type, error = %e, "polling error");
            return;
        }
    };

    for job in jobs {
        process_job(client, ledger, &job, handler);
    }
}

fn process_job(
    client: &Arc<dyn WorkflowClient>,
    ledger: &Arc<dyn ExecutionLedger>,
    job: &WorkItem,
    handler: &Arc<dyn JobHandler>,
) {
    let started = Instant::now();
    let job_key = job.key.to_string();
    let input = job.variables_json();

    debug!(key = %job_key, job_type = %job.job_type, "processing job");

    // A completion acknowledgement that fails drops the job into the failure
    // path: the engine still holds it, so hand back the retry budget.
    let outcome = handler
        .execute(job)
        .map_err(|e| e.to_string())
        .and_then(|result| {
            client
                .complete_job(job.key, result)
                .map_err(|e| e.to_string())
        });

    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(()) => {
            append(ledger, ExecutionRecord::completed(&job.job_type, &job_key, input, elapsed_ms));
            info!(key = %job_key, job_type = %job.job_type, elapsed_ms, "completed job");
        }
        Err(message) => {
            if let Err(e) = client.fail_job(job.key, job.retries - 1, &message) {
                error!(key = %job_key, error = %e, "failed to acknowledge job failure");
            }
            append(
                ledger,
                ExecutionRecord::failed(&job.job_type, &job_key, input, &message, elapsed_ms),
            );
            error!(key = %job_key, job_type = %job.job_type, elapsed_ms, error = %message, "failed job");
        }
    }
}

fn append(ledger: &Arc<dyn ExecutionLedger>, record: ExecutionRecord) {
    if let Err(e) = ledger.append(record) {
        warn!(error = %e, "failed to append execution record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    use crate::broker::InMemoryBroker;
    use crate::handler::HandlerError;
    use crate::job::Variables;
    use crate::ledger::{ExecutionStatus, InMemoryLedger};

    struct OkHandler;

    impl JobHandler for OkHandler {
        fn execute(&self, _job: &WorkItem) -> Result<Variables, HandlerError> {
            Ok(Variables::new())
        }
    }

    struct FailingHandler;

    impl JobHandler for FailingHandler {
        fn execute(&self, job: &WorkItem) -> Result<Variables, HandlerError> {
            if job.variables.contains_key("explode") {
                Err(HandlerError::Unexpected(anyhow::anyhow!("handler blew up")))
            } else {
                Ok(Variables::new())
            }
        }
    }

    fn variables(value: serde_json::Value) -> Variables {
        value.as_object().cloned().unwrap()
    }

    fn dispatcher(
        broker: &Arc<InMemoryBroker>,
        ledger: &Arc<InMemoryLedger>,
        handler: Arc<dyn JobHandler>,
    ) -> JobDispatcher {
        let mut dispatcher = JobDispatcher::new(broker.clone(), ledger.clone());
        dispatcher.bind(PollerConfig::new("test-type"), handler);
        dispatcher
    }

    #[test]
    fn tick_completes_jobs_and_records_history() {
        let broker = InMemoryBroker::arc();
        let ledger = InMemoryLedger::arc();
        broker.publish("test-type", variables(json!({"a": 1})), 3);

        dispatcher(&broker, &ledger, Arc::new(OkHandler)).run_tick("test-type");

        assert_eq!(broker.completions().len(), 1);
        let recent = ledger.recent(10).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].status, ExecutionStatus::Completed);
        assert_eq!(recent[0].job_type, "test-type");
    }

    #[test]
    fn failing_handler_decrements_retries_by_exactly_one() {
        let broker = InMemoryBroker::arc();
        let ledger = InMemoryLedger::arc();
        broker.publish("test-type", variables(json!({"explode": true})), 3);

        dispatcher(&broker, &ledger, Arc::new(FailingHandler)).run_tick("test-type");

        let failures = broker.failures();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].remaining_retries, 2);
        assert!(failures[0].error_message.contains("handler blew up"));

        let recent = ledger.recent(10).unwrap();
        assert_eq!(recent[0].status, ExecutionStatus::Failed);
        assert!(recent[0].error_message.as_deref().unwrap().contains("handler blew up"));
    }

    #[test]
    fn one_failing_job_does_not_abort_the_rest_of_the_batch() {
        let broker = InMemoryBroker::arc();
        let ledger = InMemoryLedger::arc();
        broker.publish("test-type", variables(json!({"a": 1})), 0);
        broker.publish("test-type", variables(json!({"explode": true})), 0);
        broker.publish("test-type", variables(json!({"b": 2})), 0);

        dispatcher(&broker, &ledger, Arc::new(FailingHandler)).run_tick("test-type");

        assert_eq!(broker.completions().len(), 2);
        assert_eq!(broker.failures().len(), 1);
        assert_eq!(ledger.total().unwrap(), 3);
    }

    #[test]
    fn disconnected_tick_touches_nothing() {
        let broker = InMemoryBroker::arc();
        let ledger = InMemoryLedger::arc();
        broker.publish("test-type", variables(json!({"a": 1})), 3);
        broker.set_disconnected(true);

        let dispatcher = dispatcher(&broker, &ledger, Arc::new(OkHandler));
        dispatcher.run_tick("test-type");

        assert_eq!(ledger.total().unwrap(), 0);
        assert!(!dispatcher.monitor().is_connected());

        // Reconnecting lets the next tick drain the queue.
        broker.set_disconnected(false);
        dispatcher.run_tick("test-type");
        assert_eq!(ledger.total().unwrap(), 1);
    }

    #[test]
    fn spawn_and_shutdown_round_trip() {
        let broker = InMemoryBroker::arc();
        let ledger = InMemoryLedger::arc();
        broker.publish("test-type", variables(json!({"a": 1})), 3);

        let mut dispatcher = JobDispatcher::new(broker.clone(), ledger.clone());
        dispatcher.bind(
            PollerConfig::new("test-type").with_poll_delay(Duration::from_millis(10)),
            Arc::new(OkHandler),
        );

        let handle = dispatcher.spawn();
        assert!(handle.is_running());

        // Give the poller a few ticks to drain the queue.
        let deadline = Instant::now() + Duration::from_secs(2);
        while broker.completions().is_empty() && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }

        handle.shutdown();
        assert_eq!(broker.completions().len(), 1);
    }
}
