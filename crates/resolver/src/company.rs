//! External company resolution.

use std::sync::Arc;

use tracing::{debug, info, warn};

use workmatch_matching::{contains_normalized, matches_any};
use workmatch_records::{Company, CompanyStore};

use crate::criteria::CompanyCriteria;
use crate::error::ResolveError;

/// Resolves company search criteria into zero, one, or many records.
pub struct CompanyResolver {
    companies: Arc<dyn CompanyStore>,
}

impl CompanyResolver {
    pub fn new(companies: Arc<dyn CompanyStore>) -> Self {
        Self { companies }
    }

    /// Resolve to the full match set. Empty means "not found", never an error.
    pub fn resolve(&self, criteria: &CompanyCriteria) -> Vec<Company> {
        if !criteria.has_parameters() {
            warn!("no valid search parameters provided for company search");
            return Vec::new();
        }

        if criteria.fuzzy_matching {
            return self.fuzzy_scan(criteria);
        }

        if let Some(name) = criteria.name() {
            debug!(name, "searching by exact company name");
            if let Some(company) = self.companies.find_by_name(name) {
                return vec![company];
            }

            debug!(name, "exact name match failed, trying partial match");
            let results: Vec<Company> = self
                .companies
                .all()
                .into_iter()
                .filter(|c| contains_normalized(name, &c.name))
                .collect();
            if !results.is_empty() {
                info!(name, count = results.len(), "found companies by partial name match");
            }
            return results;
        }

        // Industry and revenue have no backing fields; with only those
        // provided the non-fuzzy path returns the whole set.
        debug!("no name criterion, returning all companies");
        self.companies.all()
    }

    /// Resolve to exactly one record, for callers that require it.
    pub fn resolve_one(&self, criteria: &CompanyCriteria) -> Result<Company, ResolveError> {
        let mut companies = self.resolve(criteria);
        if companies.is_empty() {
            return Err(ResolveError::CompanyNotFound(format!(
                "name: {:?}, city: {:?}",
                criteria.name(),
                criteria.city()
            )));
        }
        Ok(companies.swap_remove(0))
    }

    /// Fuzzy scan: the name term fires against the company name, the city
    /// term against the address (city proxy); OR across the two.
    fn fuzzy_scan(&self, criteria: &CompanyCriteria) -> Vec<Company> {
        debug!(
            name = ?criteria.name(),
            city = ?criteria.city(),
            "fuzzy searching companies"
        );

        let results: Vec<Company> = self
            .companies
            .all()
            .into_iter()
            .filter(|company| {
                let name_hit = criteria
                    .name()
                    .is_some_and(|term| matches_any(term, [company.name.as_str()]));
                let city_hit = criteria.city().is_some_and(|term| {
                    matches_any(term, company.address.as_deref())
                });

                name_hit || city_hit
            })
            .collect();

        info!(count = results.len(), "fuzzy company search finished");
        results
    }
}
