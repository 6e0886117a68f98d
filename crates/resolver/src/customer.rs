//! Customer resolution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use workmatch_matching::{contains_normalized, matches_any};
use workmatch_records::{Customer, CustomerStore, Employee, EmployeeStore};

use crate::criteria::CustomerCriteria;
use crate::error::ResolveError;

/// Resolves customer search criteria into zero, one, or many records.
pub struct CustomerResolver {
    customers: Arc<dyn CustomerStore>,
    employees: Arc<dyn EmployeeStore>,
}

impl CustomerResolver {
    pub fn new(customers: Arc<dyn CustomerStore>, employees: Arc<dyn EmployeeStore>) -> Self {
        Self {
            customers,
            employees,
        }
    }

    /// Resolve to the full match set. Empty means "not found", never an error.
    pub fn resolve(&self, criteria: &CustomerCriteria) -> Vec<Customer> {
        let name = criteria.name();

        match (criteria.id, name) {
            (None, None) => {
                warn!("no valid search parameters provided for customer search");
                Vec::new()
            }
            (Some(id), Some(name)) => {
                debug!(%id, name, "searching by both id and name");
                match self.customers.find_by_id_or_name(id, name) {
                    Some(customer) => vec![customer],
                    None if criteria.fuzzy_matching => self.fuzzy_scan(name),
                    None => Vec::new(),
                }
            }
            (Some(id), None) => {
                debug!(%id, "searching by id only");
                self.customers.find_by_id(id).into_iter().collect()
            }
            (None, Some(name)) => {
                debug!(name, "searching by name only");
                if let Some(customer) = self.customers.find_by_name(name) {
                    return vec![customer];
                }

                if criteria.fuzzy_matching {
                    self.fuzzy_scan(name)
                } else {
                    debug!(name, "exact name match failed, trying partial match");
                    let results: Vec<Customer> = self
                        .customers
                        .all()
                        .into_iter()
                        .filter(|c| contains_normalized(name, &c.name))
                        .collect();
                    if !results.is_empty() {
                        info!(name, count = results.len(), "found customers by partial name match");
                    }
                    results
                }
            }
        }
    }

    /// Resolve to exactly one record, for callers that require it.
    ///
    /// Takes the first element of the match set; raises a not-found error
    /// carrying a few example names when the set is empty.
    pub fn resolve_one(&self, criteria: &CustomerCriteria) -> Result<Customer, ResolveError> {
        let mut customers = self.resolve(criteria);
        if customers.is_empty() {
            let examples = self.example_names(3);
            return Err(ResolveError::CustomerNotFound(format!(
                "id: {:?}, name: {:?}. Available customers include: {}",
                criteria.id.map(|id| id.value()),
                criteria.name(),
                examples
            )));
        }
        Ok(customers.swap_remove(0))
    }

    /// The directly-responsible employee for a customer account.
    ///
    /// Referential lookup: a missing owner is an integrity failure, not a
    /// search miss.
    pub fn owner_for(&self, customer: &Customer) -> Result<Employee, ResolveError> {
        self.employees.find_by_id(customer.owner).ok_or_else(|| {
            ResolveError::EmployeeNotFound(format!(
                "employee {} for customer '{}'",
                customer.owner, customer.name
            ))
        })
    }

    fn fuzzy_scan(&self, name: &str) -> Vec<Customer> {
        debug!(name, "performing fuzzy customer search");
        let results: Vec<Customer> = self
            .customers
            .all()
            .into_iter()
            .filter(|c| matches_any(name, [c.name.as_str()]))
            .collect();
        info!(name, count = results.len(), "fuzzy customer search finished");
        results
    }

    fn example_names(&self, limit: usize) -> String {
        let names: Vec<String> = self
            .customers
            .all()
            .into_iter()
            .take(limit)
            .map(|c| c.name)
            .collect();
        if names.is_empty() {
            "none".to_string()
        } else {
            names.join(", ")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use workmatch_core::{CustomerId, EmployeeId};
    use workmatch_records::{InMemoryCustomerStore, InMemoryEmployeeStore};

    /// Counts scans so tests can assert on short-circuiting.
    struct CountingCustomerStore {
        inner: InMemoryCustomerStore,
        scans: AtomicUsize,
        lookups: AtomicUsize,
    }

    impl CountingCustomerStore {
        fn new() -> Self {
            Self {
                inner: InMemoryCustomerStore::new(),
                scans: AtomicUsize::new(0),
                lookups: AtomicUsize::new(0),
            }
        }
    }

    impl CustomerStore for CountingCustomerStore {
        fn find_by_id(&self, id: CustomerId) -> Option<Customer> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id(id)
        }

        fn find_by_name(&self, name: &str) -> Option<Customer> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_name(name)
        }

        fn find_by_id_or_name(&self, id: CustomerId, name: &str) -> Option<Customer> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.inner.find_by_id_or_name(id, name)
        }

        fn all(&self) -> Vec<Customer> {
            self.scans.fetch_add(1, Ordering::SeqCst);
            self.inner.all()
        }
    }

    fn resolver_with(
        customers: &[(i64, &str, i64)],
        employees: &[(i64, &str)],
    ) -> (Arc<CountingCustomerStore>, CustomerResolver) {
        let store = Arc::new(CountingCustomerStore::new());
        for (id, name, owner) in customers {
            store.inner.insert(Customer::new(
                CustomerId::new(*id),
                *name,
                EmployeeId::new(*owner),
            ));
        }

        let employee_store = InMemoryEmployeeStore::arc();
        for (id, name) in employees {
            employee_store.insert(Employee::new(
                EmployeeId::new(*id),
                *name,
                "Account Manager",
                "Engineering",
            ));
        }

        let resolver = CustomerResolver::new(store.clone(), employee_store);
        (store, resolver)
    }

    #[test]
    fn no_parameters_returns_empty_without_store_access() {
        let (store, resolver) = resolver_with(&[(100, "Acme Corp", 1)], &[(1, "John Smith")]);

        let results = resolver.resolve(&CustomerCriteria::new());

        assert!(results.is_empty());
        assert_eq!(store.scans.load(Ordering::SeqCst), 0);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exact_name_match_short_circuits_any_scan() {
        let (store, resolver) = resolver_with(&[(100, "Acme Corp", 1)], &[(1, "John Smith")]);

        let criteria = CustomerCriteria::new().with_name("Acme Corp").fuzzy(true);
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(store.scans.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn id_and_name_match_either_side_in_one_lookup() {
        let (store, resolver) = resolver_with(&[(100, "Acme Corp", 1)], &[(1, "John Smith")]);

        let criteria = CustomerCriteria::new()
            .with_id(CustomerId::new(999))
            .with_name("Acme Corp");
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn id_and_name_fall_back_to_fuzzy_when_requested() {
        let (_, resolver) = resolver_with(&[(100, "Acme Corp", 1)], &[(1, "John Smith")]);

        let criteria = CustomerCriteria::new()
            .with_id(CustomerId::new(999))
            .with_name("Acme Corporation")
            .fuzzy(true);
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Acme Corp");
    }

    #[test]
    fn name_miss_without_fuzzy_uses_partial_containment() {
        let (_, resolver) = resolver_with(
            &[(100, "Acme Corp", 1), (200, "Beta LLC", 1)],
            &[(1, "John Smith")],
        );

        let criteria = CustomerCriteria::new().with_name("acme");
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].name, "Acme Corp");
    }

    #[test]
    fn partial_fallback_does_not_tolerate_typos() {
        let (_, resolver) = resolver_with(&[(100, "Acme Corp", 1)], &[(1, "John Smith")]);

        let no_fuzzy = CustomerCriteria::new().with_name("Acne Corp");
        assert!(resolver.resolve(&no_fuzzy).is_empty());

        let fuzzy = no_fuzzy.fuzzy(true);
        assert_eq!(resolver.resolve(&fuzzy).len(), 1);
    }

    #[test]
    fn resolve_one_takes_first_and_reports_examples_on_miss() {
        let (_, resolver) = resolver_with(
            &[(100, "Acme Corp", 1), (200, "Beta LLC", 1)],
            &[(1, "John Smith")],
        );

        let hit = resolver
            .resolve_one(&CustomerCriteria::new().with_name("Acme Corp"))
            .unwrap();
        assert_eq!(hit.id, CustomerId::new(100));

        let err = resolver
            .resolve_one(&CustomerCriteria::new().with_name("Nothing Here"))
            .unwrap_err();
        match err {
            ResolveError::CustomerNotFound(msg) => {
                assert!(msg.contains("Available customers include"));
            }
            other => panic!("expected CustomerNotFound, got {other:?}"),
        }
    }

    #[test]
    fn owner_for_raises_integrity_error_when_employee_is_missing() {
        let (_, resolver) = resolver_with(&[(100, "Acme Corp", 42)], &[(1, "John Smith")]);

        let customer = resolver
            .resolve(&CustomerCriteria::new().with_id(CustomerId::new(100)))
            .remove(0);
        let err = resolver.owner_for(&customer).unwrap_err();
        assert!(matches!(err, ResolveError::EmployeeNotFound(_)));
    }
}
