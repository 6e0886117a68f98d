//! Employee resolution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use workmatch_matching::{contains_normalized, is_match};
use workmatch_records::{Employee, EmployeeStore};

use crate::criteria::EmployeeCriteria;
use crate::error::ResolveError;

/// Resolves employee search criteria into zero, one, or many records.
pub struct EmployeeResolver {
    employees: Arc<dyn EmployeeStore>,
}

impl EmployeeResolver {
    pub fn new(employees: Arc<dyn EmployeeStore>) -> Self {
        Self { employees }
    }

    /// Resolve to the full match set. Empty means "not found", never an error.
    pub fn resolve(&self, criteria: &EmployeeCriteria) -> Vec<Employee> {
        if !criteria.has_parameters() {
            warn!("no valid search parameters provided for employee search");
            return Vec::new();
        }

        if criteria.exact_match {
            if let Some(name) = criteria.name() {
                debug!(name, "searching by exact full name");
                return self.employees.find_by_full_name(name).into_iter().collect();
            }
        }

        if criteria.fuzzy_matching {
            return self.fuzzy_scan(criteria);
        }

        self.flexible_scan(criteria)
    }

    /// Resolve to exactly one record, for callers that require it.
    pub fn resolve_one(&self, criteria: &EmployeeCriteria) -> Result<Employee, ResolveError> {
        let mut employees = self.resolve(criteria);
        if employees.is_empty() {
            return Err(ResolveError::EmployeeNotFound(format!(
                "name: {:?}, department: {:?}, job title: {:?}",
                criteria.name(),
                criteria.department(),
                criteria.job_title()
            )));
        }
        Ok(employees.swap_remove(0))
    }

    /// Fuzzy scan: a candidate matches when any provided field fires against
    /// its counterpart (OR across fields).
    fn fuzzy_scan(&self, criteria: &EmployeeCriteria) -> Vec<Employee> {
        debug!(
            name = ?criteria.name(),
            department = ?criteria.department(),
            job_title = ?criteria.job_title(),
            "fuzzy searching employees"
        );

        let results: Vec<Employee> = self
            .employees
            .all()
            .into_iter()
            .filter(|employee| {
                let name_hit = criteria
                    .name()
                    .is_some_and(|term| is_match(term, &employee.full_name));
                let department_hit = criteria
                    .department()
                    .is_some_and(|term| is_match(term, &employee.department));
                let title_hit = criteria
                    .job_title()
                    .is_some_and(|term| is_match(term, &employee.job_title));

                name_hit || department_hit || title_hit
            })
            .collect();

        info!(count = results.len(), "fuzzy employee search finished");
        results
    }

    /// Flexible scan: AND across provided fields; name and title match as
    /// case-insensitive substrings, department as case-insensitive equality.
    fn flexible_scan(&self, criteria: &EmployeeCriteria) -> Vec<Employee> {
        debug!(
            name = ?criteria.name(),
            department = ?criteria.department(),
            job_title = ?criteria.job_title(),
            "searching employees"
        );

        self.employees
            .all()
            .into_iter()
            .filter(|employee| {
                let name_ok = criteria
                    .name()
                    .is_none_or(|term| contains_normalized(term, &employee.full_name));
                let department_ok = criteria
                    .department()
                    .is_none_or(|term| employee.department.eq_ignore_ascii_case(term));
                let title_ok = criteria
                    .job_title()
                    .is_none_or(|term| contains_normalized(term, &employee.job_title));

                name_ok && department_ok && title_ok
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use workmatch_core::EmployeeId;
    use workmatch_records::InMemoryEmployeeStore;

    fn resolver_with(employees: &[(i64, &str, &str, &str)]) -> EmployeeResolver {
        let store = InMemoryEmployeeStore::arc();
        for (id, name, title, department) in employees {
            store.insert(Employee::new(EmployeeId::new(*id), *name, *title, *department));
        }
        EmployeeResolver::new(store)
    }

    fn sample() -> EmployeeResolver {
        resolver_with(&[
            (1, "John Smith", "Account Manager", "Engineering"),
            (2, "Jane Brown", "Support Lead", "Sales Team"),
            (3, "Jack Sparrow", "Engineer", "Engineering"),
        ])
    }

    #[test]
    fn no_parameters_returns_empty() {
        let resolver = sample();
        assert!(resolver.resolve(&EmployeeCriteria::new()).is_empty());
    }

    #[test]
    fn exact_match_flag_uses_exact_name_lookup_only() {
        let resolver = sample();

        let criteria = EmployeeCriteria::new().with_name("John Smith").exact(true);
        assert_eq!(resolver.resolve(&criteria).len(), 1);

        let miss = EmployeeCriteria::new().with_name("John").exact(true);
        assert!(resolver.resolve(&miss).is_empty());
    }

    #[test]
    fn flexible_search_ands_provided_fields() {
        let resolver = sample();

        // Name substring AND department equality must both hold.
        let criteria = EmployeeCriteria::new()
            .with_name("ja")
            .with_department("engineering");
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].full_name, "Jack Sparrow");
    }

    #[test]
    fn flexible_department_match_is_equality_not_substring() {
        let resolver = sample();

        let criteria = EmployeeCriteria::new().with_department("Sales");
        assert!(resolver.resolve(&criteria).is_empty());
    }

    #[test]
    fn fuzzy_search_ors_provided_fields() {
        let resolver = sample();

        // Department "Sales" only hits Jane via containment, but the name
        // term independently hits John: OR semantics keep both.
        let criteria = EmployeeCriteria::new()
            .with_name("John Smith")
            .with_department("Sales")
            .fuzzy(true);
        let results = resolver.resolve(&criteria);

        let names: Vec<&str> = results.iter().map(|e| e.full_name.as_str()).collect();
        assert!(names.contains(&"John Smith"));
        assert!(names.contains(&"Jane Brown"));
    }

    #[test]
    fn fuzzy_department_containment_finds_sales_team() {
        let resolver = sample();

        let criteria = EmployeeCriteria::new().with_department("Sales").fuzzy(true);
        let results = resolver.resolve(&criteria);

        assert_eq!(results.len(), 1);
        assert_eq!(results[0].department, "Sales Team");
    }

    #[test]
    fn resolve_one_errors_on_empty_set() {
        let resolver = sample();

        let err = resolver
            .resolve_one(&EmployeeCriteria::new().with_name("Nobody").exact(true))
            .unwrap_err();
        assert!(matches!(err, ResolveError::EmployeeNotFound(_)));
    }
}
