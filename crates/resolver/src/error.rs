//! Resolution errors.
//!
//! "Not found" is only an error for the exactly-one accessors; `resolve`
//! itself signals it with an empty list.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("customer not found: {0}")]
    CustomerNotFound(String),

    #[error("employee not found: {0}")]
    EmployeeNotFound(String),

    #[error("company not found: {0}")]
    CompanyNotFound(String),
}
