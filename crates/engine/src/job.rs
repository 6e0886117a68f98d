//! Activated job view.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Flat variable map carried by jobs in both directions.
pub type Variables = Map<String, Value>;

/// One unit of externally-distributed work.
///
/// Owned by the work-distribution system; the dispatcher holds this transient
/// view only while processing. The retry budget is the system's, not ours: on
/// failure we acknowledge with `retries - 1` and the system decides whether
/// to re-offer the job.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkItem {
    /// Opaque job key assigned by the workflow engine.
    pub key: i64,
    /// Type tag used to route to a handler.
    pub job_type: String,
    /// Input payload.
    pub variables: Variables,
    /// Remaining permitted re-delivery attempts.
    pub retries: i32,
    /// Activation deadline; after this the engine may re-offer the job.
    pub deadline: DateTime<Utc>,
}

impl WorkItem {
    pub fn new(
        key: i64,
        job_type: impl Into<String>,
        variables: Variables,
        retries: i32,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            key,
            job_type: job_type.into(),
            variables,
            retries,
            deadline,
        }
    }

    /// The input payload serialized for the execution ledger.
    pub fn variables_json(&self) -> String {
        Value::Object(self.variables.clone()).to_string()
    }
}
