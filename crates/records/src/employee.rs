//! Employee records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use workmatch_core::EmployeeId;

/// An employee record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    pub id: EmployeeId,
    pub full_name: String,
    pub job_title: String,
    pub department: String,
    pub phone_number: Option<String>,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        full_name: impl Into<String>,
        job_title: impl Into<String>,
        department: impl Into<String>,
    ) -> Self {
        Self {
            id,
            full_name: full_name.into(),
            job_title: job_title.into(),
            department: department.into(),
            phone_number: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }
}

/// Employee lookup surface.
pub trait EmployeeStore: Send + Sync {
    /// Exact lookup by primary identifier.
    fn find_by_id(&self, id: EmployeeId) -> Option<Employee>;

    /// Exact lookup by full name.
    fn find_by_full_name(&self, full_name: &str) -> Option<Employee>;

    /// Every employee record.
    fn all(&self) -> Vec<Employee>;
}

/// In-memory employee store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryEmployeeStore {
    rows: RwLock<HashMap<EmployeeId, Employee>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn insert(&self, employee: Employee) {
        let mut rows = self.rows.write().unwrap();
        rows.insert(employee.id, employee);
    }
}

impl EmployeeStore for InMemoryEmployeeStore {
    fn find_by_id(&self, id: EmployeeId) -> Option<Employee> {
        let rows = self.rows.read().unwrap();
        rows.get(&id).cloned()
    }

    fn find_by_full_name(&self, full_name: &str) -> Option<Employee> {
        let rows = self.rows.read().unwrap();
        rows.values().find(|e| e.full_name == full_name).cloned()
    }

    fn all(&self) -> Vec<Employee> {
        let rows = self.rows.read().unwrap();
        rows.values().cloned().collect()
    }
}
