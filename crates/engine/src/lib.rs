//! `workmatch-engine` — job fetch/execute/acknowledge against the workflow engine.
//!
//! The dispatcher polls the external work-distribution system for activated
//! jobs, hands each one to the handler bound to its type, acknowledges the
//! outcome (completion with the result payload, or failure with a decremented
//! retry budget), and appends a record to the execution ledger.

pub mod broker;
pub mod client;
pub mod dispatcher;
pub mod handler;
pub mod handlers;
pub mod job;
pub mod ledger;
pub mod variables;

pub use broker::InMemoryBroker;
pub use client::{ClientError, ConnectionMonitor, WorkflowClient};
pub use dispatcher::{DispatcherHandle, JobDispatcher, PollerConfig};
pub use handler::{HandlerError, JobHandler};
pub use job::{Variables, WorkItem};
pub use ledger::{ExecutionLedger, ExecutionRecord, ExecutionStatus, InMemoryLedger, LedgerError};
