//! Handlers for the bound job types.

pub mod match_customer;
pub mod query_company;
pub mod search_employee;

pub use match_customer::MatchCustomerHandler;
pub use query_company::QueryCompanyHandler;
pub use search_employee::SearchEmployeeHandler;

use serde_json::Value;

use crate::job::Variables;

/// Convert a `json!` object literal into a variable map.
pub(crate) fn object(value: Value) -> Variables {
    match value {
        Value::Object(map) => map,
        _ => Variables::new(),
    }
}

/// Response timestamp, RFC 3339.
pub(crate) fn timestamp() -> String {
    chrono::Utc::now().to_rfc3339()
}
