//! Canonical sample dataset for development and demos.

use workmatch_core::{CompanyId, CustomerId, EmployeeId};

use crate::company::{Company, InMemoryCompanyStore};
use crate::customer::{Customer, InMemoryCustomerStore};
use crate::employee::{Employee, InMemoryEmployeeStore};

/// Populate the given stores with the sample records.
pub fn seed(
    customers: &InMemoryCustomerStore,
    employees: &InMemoryEmployeeStore,
    companies: &InMemoryCompanyStore,
) {
    for employee in sample_employees() {
        employees.insert(employee);
    }
    for customer in sample_customers() {
        customers.insert(customer);
    }
    for company in sample_companies() {
        companies.insert(company);
    }
}

pub fn sample_employees() -> Vec<Employee> {
    vec![
        Employee::new(EmployeeId::new(1), "John Smith", "Account Manager", "Engineering")
            .with_phone("123-456-7890"),
        Employee::new(EmployeeId::new(2), "Jane Brown", "Support Lead", "Support")
            .with_phone("987-654-3210"),
    ]
}

pub fn sample_customers() -> Vec<Customer> {
    vec![
        Customer::new(CustomerId::new(100), "Acme Corp", EmployeeId::new(1)),
        Customer::new(CustomerId::new(200), "Beta LLC", EmployeeId::new(2)),
    ]
}

pub fn sample_companies() -> Vec<Company> {
    vec![
        Company::new(CompanyId::new(1000), "Globex Inc")
            .with_address("1 Main St, Metropolis")
            .with_contact("Jane Doe")
            .with_phone("555-111-2222"),
        Company::new(CompanyId::new(2000), "Initech")
            .with_address("42 Silicon Ave, Tech City")
            .with_contact("John Roe")
            .with_phone("555-333-4444"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customer::CustomerStore;
    use crate::employee::EmployeeStore;

    #[test]
    fn seeded_customers_reference_seeded_employees() {
        let customers = InMemoryCustomerStore::new();
        let employees = InMemoryEmployeeStore::new();
        let companies = InMemoryCompanyStore::new();
        seed(&customers, &employees, &companies);

        for customer in customers.all() {
            assert!(employees.find_by_id(customer.owner).is_some());
        }
    }
}
