//! `workmatch-resolver` — translating ambiguous search criteria into records.
//!
//! Each domain resolver applies the same cascade: exact lookup first, then a
//! plain partial fallback, then (only when requested) the tiered fuzzy scan
//! from `workmatch-matching`. Resolvers always return the full match set;
//! single-vs-multiple selection belongs to the caller, with thin
//! exactly-one accessors for referential lookups.

pub mod company;
pub mod criteria;
pub mod customer;
pub mod employee;
pub mod error;

pub use company::CompanyResolver;
pub use criteria::{CompanyCriteria, CustomerCriteria, EmployeeCriteria};
pub use customer::CustomerResolver;
pub use employee::EmployeeResolver;
pub use error::ResolveError;
