//! Execution ledger: one immutable record per processed job.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Outcome of a dispatched job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionStatus {
    Completed,
    Failed,
}

/// Record of one job execution. Created exactly once per processed job and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionRecord {
    pub id: Uuid,
    pub job_type: String,
    pub job_key: String,
    pub status: ExecutionStatus,
    /// Serialized input payload.
    pub variables: String,
    pub error_message: Option<String>,
    pub executed_at: DateTime<Utc>,
    pub duration_ms: u64,
}

impl ExecutionRecord {
    pub fn completed(
        job_type: impl Into<String>,
        job_key: impl Into<String>,
        variables: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            job_type: job_type.into(),
            job_key: job_key.into(),
            status: ExecutionStatus::Completed,
            variables: variables.into(),
            error_message: None,
            executed_at: Utc::now(),
            duration_ms,
        }
    }

    pub fn failed(
        job_type: impl Into<String>,
        job_key: impl Into<String>,
        variables: impl Into<String>,
        error_message: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            job_type: job_type.into(),
            job_key: job_key.into(),
            status: ExecutionStatus::Failed,
            variables: variables.into(),
            error_message: Some(error_message.into()),
            executed_at: Utc::now(),
            duration_ms,
        }
    }
}

/// Ledger error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum LedgerError {
    #[error("ledger storage error: {0}")]
    Storage(String),
}

/// Append-only execution history with a small read model.
pub trait ExecutionLedger: Send + Sync {
    /// Append a record.
    fn append(&self, record: ExecutionRecord) -> Result<(), LedgerError>;

    /// Most recent records, newest first.
    fn recent(&self, limit: usize) -> Result<Vec<ExecutionRecord>, LedgerError>;

    /// Number of records executed at or after the given instant.
    fn count_since(&self, since: DateTime<Utc>) -> Result<u64, LedgerError>;

    /// Record counts grouped by job type.
    fn count_by_type(&self) -> Result<HashMap<String, u64>, LedgerError>;

    /// Total number of records.
    fn total(&self) -> Result<u64, LedgerError>;
}

/// In-memory ledger for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryLedger {
    records: RwLock<Vec<ExecutionRecord>>,
}

impl InMemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }
}

impl ExecutionLedger for InMemoryLedger {
    fn append(&self, record: ExecutionRecord) -> Result<(), LedgerError> {
        let mut records = self.records.write().unwrap();
        records.push(record);
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<ExecutionRecord>, LedgerError> {
        let records = self.records.read().unwrap();
        let mut result: Vec<ExecutionRecord> = records.clone();
        result.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
        result.truncate(limit);
        Ok(result)
    }

    fn count_since(&self, since: DateTime<Utc>) -> Result<u64, LedgerError> {
        let records = self.records.read().unwrap();
        Ok(records.iter().filter(|r| r.executed_at >= since).count() as u64)
    }

    fn count_by_type(&self) -> Result<HashMap<String, u64>, LedgerError> {
        let records = self.records.read().unwrap();
        let mut counts = HashMap::new();
        for record in records.iter() {
            *counts.entry(record.job_type.clone()).or_insert(0) += 1;
        }
        Ok(counts)
    }

    fn total(&self) -> Result<u64, LedgerError> {
        let records = self.records.read().unwrap();
        Ok(records.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recent_orders_newest_first_and_truncates() {
        let ledger = InMemoryLedger::new();
        for i in 0..5 {
            ledger
                .append(ExecutionRecord::completed(
                    "search-employee",
                    i.to_string(),
                    "{}",
                    10,
                ))
                .unwrap();
        }

        let recent = ledger.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert!(recent[0].executed_at >= recent[1].executed_at);
        assert!(recent[1].executed_at >= recent[2].executed_at);
    }

    #[test]
    fn counts_group_by_type() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(ExecutionRecord::completed("a", "1", "{}", 1))
            .unwrap();
        ledger
            .append(ExecutionRecord::completed("a", "2", "{}", 1))
            .unwrap();
        ledger
            .append(ExecutionRecord::failed("b", "3", "{}", "boom", 1))
            .unwrap();

        let counts = ledger.count_by_type().unwrap();
        assert_eq!(counts.get("a"), Some(&2));
        assert_eq!(counts.get("b"), Some(&1));
        assert_eq!(ledger.total().unwrap(), 3);
    }

    #[test]
    fn count_since_filters_by_time() {
        let ledger = InMemoryLedger::new();
        ledger
            .append(ExecutionRecord::completed("a", "1", "{}", 1))
            .unwrap();

        let past = Utc::now() - chrono::Duration::hours(1);
        let future = Utc::now() + chrono::Duration::hours(1);
        assert_eq!(ledger.count_since(past).unwrap(), 1);
        assert_eq!(ledger.count_since(future).unwrap(), 0);
    }
}
