//! Search criteria per domain.
//!
//! Every text field is optional and blank-insensitive: a missing, empty, or
//! whitespace-only value counts as "not provided". Each criteria type knows
//! whether it carries at least one usable parameter; resolution
//! short-circuits to an empty result when it does not.

use serde::{Deserialize, Serialize};

use workmatch_core::CustomerId;

fn provided(field: &Option<String>) -> Option<&str> {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Criteria for customer resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerCriteria {
    pub id: Option<CustomerId>,
    pub name: Option<String>,
    pub allow_multiple: bool,
    pub fuzzy_matching: bool,
}

impl CustomerCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: CustomerId) -> Self {
        self.id = Some(id);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn allow_multiple(mut self, allow: bool) -> Self {
        self.allow_multiple = allow;
        self
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy_matching = fuzzy;
        self
    }

    /// The trimmed name, if one was actually provided.
    pub fn name(&self) -> Option<&str> {
        provided(&self.name)
    }

    pub fn has_parameters(&self) -> bool {
        self.id.is_some() || self.name().is_some()
    }
}

/// Criteria for employee resolution.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmployeeCriteria {
    pub name: Option<String>,
    pub department: Option<String>,
    pub job_title: Option<String>,
    pub exact_match: bool,
    pub fuzzy_matching: bool,
}

impl EmployeeCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_department(mut self, department: impl Into<String>) -> Self {
        self.department = Some(department.into());
        self
    }

    pub fn with_job_title(mut self, job_title: impl Into<String>) -> Self {
        self.job_title = Some(job_title.into());
        self
    }

    pub fn exact(mut self, exact: bool) -> Self {
        self.exact_match = exact;
        self
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy_matching = fuzzy;
        self
    }

    pub fn name(&self) -> Option<&str> {
        provided(&self.name)
    }

    pub fn department(&self) -> Option<&str> {
        provided(&self.department)
    }

    pub fn job_title(&self) -> Option<&str> {
        provided(&self.job_title)
    }

    pub fn has_parameters(&self) -> bool {
        self.name().is_some() || self.department().is_some() || self.job_title().is_some()
    }
}

/// Criteria for company resolution.
///
/// Industry and revenue are accepted for wire compatibility but have no
/// backing fields on the company record; only name and city (matched against
/// the address) participate in fuzzy search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyCriteria {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub city: Option<String>,
    pub revenue: Option<i64>,
    pub fuzzy_matching: bool,
}

impl CompanyCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_industry(mut self, industry: impl Into<String>) -> Self {
        self.industry = Some(industry.into());
        self
    }

    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn with_revenue(mut self, revenue: i64) -> Self {
        self.revenue = Some(revenue);
        self
    }

    pub fn fuzzy(mut self, fuzzy: bool) -> Self {
        self.fuzzy_matching = fuzzy;
        self
    }

    pub fn name(&self) -> Option<&str> {
        provided(&self.name)
    }

    pub fn industry(&self) -> Option<&str> {
        provided(&self.industry)
    }

    pub fn city(&self) -> Option<&str> {
        provided(&self.city)
    }

    pub fn has_parameters(&self) -> bool {
        self.name().is_some()
            || self.industry().is_some()
            || self.city().is_some()
            || self.revenue.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_fields_count_as_missing() {
        let criteria = CustomerCriteria::new().with_name("   ");
        assert_eq!(criteria.name(), None);
        assert!(!criteria.has_parameters());
    }

    #[test]
    fn id_alone_is_a_usable_parameter() {
        let criteria = CustomerCriteria::new().with_id(CustomerId::new(100));
        assert!(criteria.has_parameters());
    }

    #[test]
    fn provided_fields_are_trimmed() {
        let criteria = EmployeeCriteria::new().with_department("  Sales  ");
        assert_eq!(criteria.department(), Some("Sales"));
    }

    #[test]
    fn revenue_alone_counts_for_companies() {
        let criteria = CompanyCriteria::new().with_revenue(1_000_000);
        assert!(criteria.has_parameters());
    }
}
