//! Employees domain module: the `Employee` aggregate and its use cases.
//!
//! The aggregate and value objects are pure domain logic (no IO). The service
//! orchestrates them against the persistence, password-hashing and projection
//! ports declared here; adapters live in `staffhub-infra` and `staffhub-api`.

pub mod dto;
pub mod employee;
pub mod phone;
pub mod projection;
pub mod repository;
pub mod service;

pub use dto::{
    CreateEmployeeRequest, EmployeeResponse, PhoneNumberRequest, PhoneNumberResponse,
    UpdateEmployeeRequest,
};
pub use employee::{age_on, Employee, EmployeeSnapshot, RegisterEmployee, MINIMUM_AGE};
pub use phone::PhoneNumber;
pub use projection::{EmployeeProjector, ResponseProjector};
pub use repository::{EmployeeRepository, RepositoryError, UniqueKey};
pub use service::{EmployeeService, ErrorKind, ServiceError};
