//! Handler for `query-for-company` jobs.
//!
//! Unlike the other search handlers, the completion payload is the nested
//! `companySearchResult` object alone; there are no flattened top-level
//! fields. Validation failures complete the job with a structured
//! `VALIDATION_ERROR` result, so no retry budget is consumed.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info};

use workmatch_records::Company;
use workmatch_resolver::{CompanyCriteria, CompanyResolver};

use crate::handler::{HandlerError, JobHandler};
use crate::handlers::{object, timestamp};
use crate::job::{Variables, WorkItem};
use crate::variables;

/// Type tag this handler binds to.
pub const JOB_TYPE: &str = "query-for-company";

pub struct QueryCompanyHandler {
    resolver: Arc<CompanyResolver>,
}

impl QueryCompanyHandler {
    pub fn new(resolver: Arc<CompanyResolver>) -> Self {
        Self { resolver }
    }
}

impl JobHandler for QueryCompanyHandler {
    fn execute(&self, job: &WorkItem) -> Result<Variables, HandlerError> {
        debug!(key = job.key, "processing query-for-company job");

        let vars = &job.variables;
        let criteria = CompanyCriteria {
            name: variables::get_str(vars, "companyName"),
            industry: variables::get_str(vars, "industry"),
            city: variables::get_str(vars, "city"),
            revenue: variables::get_i64(vars, "revenue"),
            fuzzy_matching: variables::get_bool(vars, "fuzzyMatching").unwrap_or(false),
        };

        info!(
            name = ?criteria.name(),
            industry = ?criteria.industry(),
            city = ?criteria.city(),
            revenue = ?criteria.revenue,
            fuzzy = criteria.fuzzy_matching,
            "querying companies"
        );

        if !criteria.has_parameters() {
            let message = "At least one search parameter must be provided";
            error!(message, "validation failed");
            return Ok(wrap(json!({
                "status": "VALIDATION_ERROR",
                "error": message,
                "companies": [],
                "companyCount": 0,
                "timestamp": timestamp(),
            })));
        }

        let companies = self.resolver.resolve(&criteria);

        if companies.is_empty() {
            info!("no company records found with the search criteria");
            return Ok(wrap(json!({
                "status": "NOT_FOUND",
                "message": "No company records could be found with the provided search criteria",
                "companies": [],
                "companyCount": 0,
                "timestamp": timestamp(),
                "searchParameters": search_parameters(&criteria),
            })));
        }

        info!(count = companies.len(), "found companies with the search criteria");
        Ok(wrap(json!({
            "status": "SUCCESS",
            "companies": company_values(&companies),
            "companyCount": companies.len(),
            "timestamp": timestamp(),
            "searchParameters": search_parameters(&criteria),
        })))
    }
}

fn wrap(nested: Value) -> Variables {
    object(json!({ "companySearchResult": nested }))
}

fn company_values(companies: &[Company]) -> Vec<Value> {
    companies
        .iter()
        .map(|company| {
            json!({
                "companyId": company.id,
                "companyName": company.name,
                "address": company.address.clone().unwrap_or_default(),
                "contactPerson": company.contact_person.clone().unwrap_or_default(),
                "phoneNumber": company.phone_number.clone().unwrap_or_default(),
            })
        })
        .collect()
}

fn search_parameters(criteria: &CompanyCriteria) -> Variables {
    let mut params = Variables::new();
    if let Some(name) = criteria.name() {
        params.insert("companyName".to_string(), json!(name));
    }
    if let Some(industry) = criteria.industry() {
        params.insert("industry".to_string(), json!(industry));
    }
    if let Some(city) = criteria.city() {
        params.insert("city".to_string(), json!(city));
    }
    if let Some(revenue) = criteria.revenue {
        params.insert("revenue".to_string(), json!(revenue));
    }
    params.insert("fuzzyMatching".to_string(), json!(criteria.fuzzy_matching));
    params
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use workmatch_core::CompanyId;
    use workmatch_records::InMemoryCompanyStore;

    fn handler() -> QueryCompanyHandler {
        let store = InMemoryCompanyStore::arc();
        store.insert(
            Company::new(CompanyId::new(1000), "Globex Inc")
                .with_address("1 Main St, Metropolis")
                .with_contact("Jane Doe")
                .with_phone("555-111-2222"),
        );
        store.insert(
            Company::new(CompanyId::new(2000), "Initech").with_address("42 Silicon Ave, Tech City"),
        );

        QueryCompanyHandler::new(Arc::new(CompanyResolver::new(store)))
    }

    fn job(variables: Value) -> WorkItem {
        WorkItem::new(
            9,
            JOB_TYPE,
            variables.as_object().cloned().unwrap(),
            3,
            Utc::now(),
        )
    }

    #[test]
    fn exact_name_query_returns_the_company() {
        let result = handler()
            .execute(&job(json!({"companyName": "Globex Inc"})))
            .unwrap();

        let nested = &result["companySearchResult"];
        assert_eq!(nested["status"], "SUCCESS");
        assert_eq!(nested["companyCount"], 1);
        assert_eq!(nested["companies"][0]["companyName"], "Globex Inc");
        assert_eq!(nested["companies"][0]["contactPerson"], "Jane Doe");
    }

    #[test]
    fn fuzzy_city_query_matches_the_address() {
        let result = handler()
            .execute(&job(json!({"city": "Metropolis", "fuzzyMatching": true})))
            .unwrap();

        let nested = &result["companySearchResult"];
        assert_eq!(nested["status"], "SUCCESS");
        assert_eq!(nested["companies"][0]["companyName"], "Globex Inc");
    }

    #[test]
    fn empty_criteria_complete_with_a_validation_error() {
        let result = handler().execute(&job(json!({}))).unwrap();

        let nested = &result["companySearchResult"];
        assert_eq!(nested["status"], "VALIDATION_ERROR");
        assert_eq!(nested["companyCount"], 0);
    }

    #[test]
    fn unknown_name_yields_not_found() {
        let result = handler()
            .execute(&job(json!({"companyName": "Hooli"})))
            .unwrap();

        let nested = &result["companySearchResult"];
        assert_eq!(nested["status"], "NOT_FOUND");
        assert_eq!(nested["searchParameters"]["companyName"], "Hooli");
    }
}
