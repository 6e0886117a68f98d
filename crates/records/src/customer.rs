//! Customer records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use workmatch_core::{CustomerId, EmployeeId};

/// A customer account.
///
/// `owner` is the directly-responsible employee for the account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub owner: EmployeeId,
}

impl Customer {
    pub fn new(id: CustomerId, name: impl Into<String>, owner: EmployeeId) -> Self {
        Self {
            id,
            name: name.into(),
            owner,
        }
    }
}

/// Customer lookup surface.
pub trait CustomerStore: Send + Sync {
    /// Exact lookup by primary identifier.
    fn find_by_id(&self, id: CustomerId) -> Option<Customer>;

    /// Exact lookup by name.
    fn find_by_name(&self, name: &str) -> Option<Customer>;

    /// Exact lookup matching either the identifier or the name, in a single
    /// round trip.
    fn find_by_id_or_name(&self, id: CustomerId, name: &str) -> Option<Customer>;

    /// Every customer record (fuzzy scans iterate this).
    fn all(&self) -> Vec<Customer>;
}

/// In-memory customer store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    rows: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn insert(&self, customer: Customer) {
        let mut rows = self.rows.write().unwrap();
        rows.insert(customer.id, customer);
    }
}

impl CustomerStore for InMemoryCustomerStore {
    fn find_by_id(&self, id: CustomerId) -> Option<Customer> {
        let rows = self.rows.read().unwrap();
        rows.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Customer> {
        let rows = self.rows.read().unwrap();
        rows.values().find(|c| c.name == name).cloned()
    }

    fn find_by_id_or_name(&self, id: CustomerId, name: &str) -> Option<Customer> {
        let rows = self.rows.read().unwrap();
        rows.values()
            .find(|c| c.id == id || c.name == name)
            .cloned()
    }

    fn all(&self) -> Vec<Customer> {
        let rows = self.rows.read().unwrap();
        rows.values().cloned().collect()
    }
}
