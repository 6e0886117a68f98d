//! Job handler seam.

use thiserror::Error;

use crate::job::{Variables, WorkItem};

/// Failure crossing the handler boundary.
///
/// Handlers convert validation and not-found outcomes into structured result
/// payloads themselves; only genuinely unexpected failures surface here and
/// take the dispatcher's failure-acknowledgement path.
#[derive(Debug, Error)]
pub enum HandlerError {
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

/// A handler bound to one job type.
pub trait JobHandler: Send + Sync {
    /// Execute the job and produce the completion payload.
    fn execute(&self, job: &WorkItem) -> Result<Variables, HandlerError>;
}
