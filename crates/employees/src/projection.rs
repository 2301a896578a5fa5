//! Projection port: aggregate → external read shape.

use crate::dto::{EmployeeResponse, PhoneNumberResponse};
use crate::employee::Employee;

pub trait EmployeeProjector: Send + Sync {
    fn project(&self, employee: &Employee) -> EmployeeResponse;
}

/// Default projector: flattens phones to `(number, type)` pairs and drops the
/// password hash and activation flag.
#[derive(Debug, Default, Clone, Copy)]
pub struct ResponseProjector;

impl EmployeeProjector for ResponseProjector {
    fn project(&self, employee: &Employee) -> EmployeeResponse {
        EmployeeResponse {
            id: employee.id_typed(),
            first_name: employee.first_name().to_string(),
            last_name: employee.last_name().to_string(),
            email: employee.email().to_string(),
            doc_number: employee.doc_number().to_string(),
            date_of_birth: employee.date_of_birth(),
            role: employee.role(),
            manager_name: employee.manager_name().map(str::to_string),
            phones: employee
                .phones()
                .iter()
                .map(|p| PhoneNumberResponse {
                    number: p.number().to_string(),
                    kind: p.kind().to_string(),
                })
                .collect(),
        }
    }
}
