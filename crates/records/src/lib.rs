//! `workmatch-records` — customer/employee/company records and their stores.
//!
//! The entities here are plain read views: the core only needs field access,
//! never persistence mechanics. Each domain exposes a narrow store trait (the
//! lookup surface the resolvers use) plus an in-memory implementation for
//! tests and development.

pub mod company;
pub mod customer;
pub mod employee;
pub mod seed;

pub use company::{Company, CompanyStore, InMemoryCompanyStore};
pub use customer::{Customer, CustomerStore, InMemoryCustomerStore};
pub use employee::{Employee, EmployeeStore, InMemoryEmployeeStore};
