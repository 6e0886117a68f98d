//! Handler for `search-employee` jobs.

use std::sync::Arc;

use serde_json::{Value, json};
use tracing::{debug, error, info};

use workmatch_records::Employee;
use workmatch_resolver::{EmployeeCriteria, EmployeeResolver};

use crate::handler::{HandlerError, JobHandler};
use crate::handlers::{object, timestamp};
use crate::job::{Variables, WorkItem};
use crate::variables;

/// Type tag this handler binds to.
pub const JOB_TYPE: &str = "search-employee";

pub struct SearchEmployeeHandler {
    resolver: Arc<EmployeeResolver>,
}

impl SearchEmployeeHandler {
    pub fn new(resolver: Arc<EmployeeResolver>) -> Self {
        Self { resolver }
    }
}

impl JobHandler for SearchEmployeeHandler {
    fn execute(&self, job: &WorkItem) -> Result<Variables, HandlerError> {
        debug!(key = job.key, "processing search-employee job");

        let vars = &job.variables;
        let criteria = EmployeeCriteria {
            name: variables::get_str(vars, "employeeName"),
            department: variables::get_str(vars, "department"),
            job_title: variables::get_str(vars, "jobTitle"),
            exact_match: variables::get_bool(vars, "exactMatch").unwrap_or(false),
            fuzzy_matching: variables::get_bool(vars, "fuzzyMatching").unwrap_or(false),
        };

        info!(
            name = ?criteria.name(),
            department = ?criteria.department(),
            job_title = ?criteria.job_title(),
            exact = criteria.exact_match,
            fuzzy = criteria.fuzzy_matching,
            "searching employees"
        );

        if !criteria.has_parameters() {
            let message =
                "At least one search parameter (employeeName, department, or jobTitle) must be provided";
            error!(message, "validation failed");
            return Ok(status_result(
                "VALIDATION_ERROR",
                json!({
                    "status": "VALIDATION_ERROR",
                    "message": message,
                    "employeeCount": 0,
                    "employees": [],
                    "timestamp": timestamp(),
                    "searchParameters": search_parameters(&criteria),
                }),
                &[],
            ));
        }

        let employees = self.resolver.resolve(&criteria);

        if employees.is_empty() {
            info!("no employees found with the search criteria");
            return Ok(status_result(
                "NOT_FOUND",
                json!({
                    "status": "NOT_FOUND",
                    "message": "No employee records could be found with the provided search criteria",
                    "employeeCount": 0,
                    "employees": [],
                    "timestamp": timestamp(),
                    "searchParameters": search_parameters(&criteria),
                }),
                &[],
            ));
        }

        info!(count = employees.len(), "found employees matching the search criteria");
        let nested = json!({
            "status": "SUCCESS",
            "employeeCount": employees.len(),
            "employees": employee_values(&employees),
            "timestamp": timestamp(),
            "searchParameters": search_parameters(&criteria),
        });
        Ok(status_result("SUCCESS", nested, &employees))
    }
}

fn employee_values(employees: &[Employee]) -> Vec<Value> {
    employees
        .iter()
        .map(|employee| {
            json!({
                "employeeId": employee.id,
                "fullName": employee.full_name,
                "jobTitle": employee.job_title,
                "department": employee.department,
                "phoneNumber": employee.phone_number.clone().unwrap_or_default(),
            })
        })
        .collect()
}

fn search_parameters(criteria: &EmployeeCriteria) -> Variables {
    let mut params = Variables::new();
    if let Some(name) = criteria.name() {
        params.insert("employeeName".to_string(), json!(name));
    }
    if let Some(department) = criteria.department() {
        params.insert("department".to_string(), json!(department));
    }
    if let Some(title) = criteria.job_title() {
        params.insert("jobTitle".to_string(), json!(title));
    }
    params.insert("exactMatch".to_string(), json!(criteria.exact_match));
    params.insert("fuzzyMatching".to_string(), json!(criteria.fuzzy_matching));
    params
}

fn status_result(status: &str, nested: Value, employees: &[Employee]) -> Variables {
    let mut result = object(json!({
        "employeeSearchResult": nested,
        "searchStatus": status,
        "employees": employee_values(employees),
        "employeeCount": employees.len(),
    }));

    // Individual fields only when the match is unambiguous.
    if let [employee] = employees {
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
