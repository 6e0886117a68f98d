//! External company records.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};

use workmatch_core::CompanyId;

/// An external company record.
///
/// There is no dedicated city field; the address doubles as the city proxy
/// for fuzzy search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub id: CompanyId,
    pub name: String,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub phone_number: Option<String>,
}

impl Company {
    pub fn new(id: CompanyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            address: None,
            contact_person: None,
            phone_number: None,
        }
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn with_contact(mut self, contact: impl Into<String>) -> Self {
        self.contact_person = Some(contact.into());
        self
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone_number = Some(phone.into());
        self
    }
}

/// Company lookup surface.
pub trait CompanyStore: Send + Sync {
    /// Exact lookup by primary identifier.
    fn find_by_id(&self, id: CompanyId) -> Option<Company>;

    /// Exact lookup by name.
    fn find_by_name(&self, name: &str) -> Option<Company>;

    /// Every company record.
    fn all(&self) -> Vec<Company>;
}

/// In-memory company store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCompanyStore {
    rows: RwLock<HashMap<CompanyId, Company>>,
}

impl InMemoryCompanyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arc() -> Arc<Self> {
        Arc::new(Self::new())
    }

    pub fn insert(&self, company: Company) {
        let mut rows = self.rows.write().unwrap();
        rows.insert(company.id, company);
    }
}

impl CompanyStore for InMemoryCompanyStore {
    fn find_by_id(&self, id: CompanyId) -> Option<Company> {
        let rows = self.rows.read().unwrap();
        rows.get(&id).cloned()
    }

    fn find_by_name(&self, name: &str) -> Option<Company> {
        let rows = self.rows.read().unwrap();
        rows.values().find(|c| c.name == name).cloned()
    }

    fn all(&self) -> Vec<Company> {
        let rows = self.rows.read().unwrap();
        rows.values().cloned().collect()
    }
}
