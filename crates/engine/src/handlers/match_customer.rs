//! Handler for `match-customer-with-dri` jobs.
//!
//! Resolves a customer from the job's search criteria and pairs every match
//! with its directly-responsible employee. The completion payload carries a
//! nested `matchingResult` object plus flattened fields; the individual
//! customer/employee fields are only populated when exactly one match was
//! found, and are explicit nulls otherwise.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info};

use workmatch_core::CustomerId;
use workmatch_records::{Customer, Employee};
use workmatch_resolver::{CustomerCriteria, CustomerResolver};

use crate::handler::{HandlerError, JobHandler};
use crate::handlers::{object, timestamp};
use crate::job::{Variables, WorkItem};
use crate::variables;

/// Type tag this handler binds to.
pub const JOB_TYPE: &str = "match-customer-with-dri";

pub struct MatchCustomerHandler {
    resolver: Arc<CustomerResolver>,
}

impl MatchCustomerHandler {
    pub fn new(resolver: Arc<CustomerResolver>) -> Self {
        Self { resolver }
    }
}

impl JobHandler for MatchCustomerHandler {
    fn execute(&self, job: &WorkItem) -> Result<Variables, HandlerError> {
        debug!(key = job.key, "processing match-customer-with-dri job");

        let vars = &job.variables;
        let customer_id = variables::get_i64(vars, "customerId").map(CustomerId::new);
        let customer_name = variables::get_str(vars, "customerName");
        let allow_multiple = variables::get_bool(vars, "allowMultiple");
        let fuzzy_matching = variables::get_bool(vars, "fuzzyMatching");

        info!(
            ?customer_id,
            ?customer_name,
            ?allow_multiple,
            ?fuzzy_matching,
            "matching customer"
        );

        if customer_id.is_none() && customer_name.is_none() {
            let message =
                "At least one search parameter (customerId or customerName) must be provided";
            error!(message, "validation failed");
            return Ok(validation_result(message));
        }

        let criteria = CustomerCriteria {
            id: customer_id,
            name: customer_name,
            allow_multiple: allow_multiple.unwrap_or(false),
            fuzzy_matching: fuzzy_matching.unwrap_or(false),
        };

        let customers = if criteria.allow_multiple {
            self.resolver.resolve(&criteria)
        } else {
            // Single-match contract for legacy callers: first of the set.
            match self.resolver.resolve_one(&criteria) {
                Ok(customer) => vec![customer],
                Err(_) => Vec::new(),
            }
        };

        if customers.is_empty() {
            info!("no customer record found, returning not-found response");
            return Ok(not_found_result(&criteria, fuzzy_matching));
        }

        let mut matched = Vec::with_capacity(customers.len());
        for customer in customers {
            match self.resolver.owner_for(&customer) {
                Ok(employee) => matched.push((customer, employee)),
                Err(e) => {
                    error!(error = %e, "error while matching customer with DRI");
                    return Ok(error_result(&e.to_string()));
                }
            }
        }

        info!(count = matched.len(), "matched customers with their DRI employees");
        Ok(success_result(&criteria, allow_multiple, fuzzy_matching, &matched))
    }
}

fn pair_value(customer: &Customer, employee: &Employee) -> Value {
    json!({
        "customer": {
            "customerId": customer.id,
            "customerName": customer.name,
            "employeeId": customer.owner,
        },
        "employee": {
            "employeeId": employee.id,
            "fullName": employee.full_name,
            "jobTitle": employee.job_title,
            "department": employee.department,
            "phoneNumber": employee.phone_number.clone().unwrap_or_default(),
        },
    })
}

/// Top-level shape shared by every zero-result outcome.
fn empty_result(status: &str, matching_result: Value) -> Variables {
    object(json!({
        "matchingResult": matching_result,
        "matchStatus": status,
        "customers": [],
        "customerCount": 0,
        "customerId": null,
        "customerName": null,
        "employeeId": null,
        "employeeName": null,
        "employeeTitle": null,
        "employeeDepartment": null,
        "employeePhone": null,
    }))
}

fn validation_result(message: &str) -> Variables {
    empty_result(
        "VALIDATION_ERROR",
        json!({
            "status": "VALIDATION_ERROR",
            "error": message,
            "timestamp": timestamp(),
        }),
    )
}

fn not_found_result(criteria: &CustomerCriteria, fuzzy_matching: Option<bool>) -> Variables {
    let mut search_params = Variables::new();
    if let Some(id) = criteria.id {
        search_params.insert("customerId".to_string(), json!(id));
    }
    if let Some(name) = criteria.name() {
        search_params.insert("customerName".to_string(), json!(name));
    }
    if let Some(fuzzy) = fuzzy_matching {
        search_params.insert("fuzzyMatching".to_string(), json!(fuzzy));
    }

    empty_result(
        "NOT_FOUND",
        json!({
            "status": "NOT_FOUND",
            "message": "No customer record could be found with the provided search criteria",
            "timestamp": timestamp(),
            "searchParameters": search_params,
        }),
    )
}

fn error_result(message: &str) -> Variables {
    empty_result(
        "ERROR",
        json!({
            "status": "ERROR",
            "error": message,
            "timestamp": timestamp(),
        }),
    )
}

fn success_result(
    criteria: &CustomerCriteria,
    allow_multiple: Option<bool>,
    fuzzy_matching: Option<bool>,
    matched: &[(Customer, Employee)],
) -> Variables {
    let pairs: Vec<Value> = matched
        .iter()
        .map(|(customer, employee)| pair_value(customer, employee))
        .collect();

    let mut search_params = Variables::new();
    if let Some(id) = criteria.id {
        search_params.insert("customerId".to_string(), json!(id));
    }
    if let Some(name) = criteria.name() {
        search_params.insert("customerName".to_string(), json!(name));
    }
    if let Some(allow) = allow_multiple {
        search_params.insert("allowMultiple".to_string(), json!(allow));
    }
    if let Some(fuzzy) = fuzzy_matching {
        search_params.insert("fuzzyMatching".to_string(), json!(fuzzy));
    }

    let mut result = object(json!({
        "matchingResult": {
            "status": "SUCCESS",
            "customers": pairs.clone(),
            "customerCount": matched.len(),
            "timestamp": timestamp(),
            "searchParameters": search_params,
        },
        "matchStatus": "SUCCESS",
        "customers": pairs,
        "customerCount": matched.len(),
    }));

    // Individual fields only when the match is unambiguous.
    if let [(customer, employee)] = matched {
        result.insert("customerId".to_string(), json!(customer.id));
        result.insert("customerName".to_string(), json!(customer.name));
        result.insert("employeeId".to_string(), json!(employee.id));
        result.insert("employeeName".to_string(), json!(employee.full_name));
        result.insert("employeeTitle".to_string(), json!(employee.job_title));
        result.insert("employeeDepartment".to_string(), json!(employee.department));
        result.insert(
            "employeePhone".to_string(),
            json!(employee.phone_number.clone().unwrap_or_default()),
        );
    } else {
        for field in [
            "customerId",
            "customerName",
            "employeeId",
            "employeeName",
            "employeeTitle",
            "employeeDepartment",
            "employeePhone",
        ] {
            result.insert(field.to_string(), Value::Null);
        }
    }

    result
}
