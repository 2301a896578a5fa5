//! Employee use cases (application service).
//!
//! ```text
//! request DTO
//!   ↓
//! 1. Uniqueness / existence pre-checks (repository port)
//!   ↓
//! 2. Aggregate construction or mutation (invariants enforced there)
//!   ↓
//! 3. Stage + commit (one unit of work)
//!   ↓
//! 4. Project to the response shape
//! ```
//!
//! Pre-checks are not atomic with concurrent requests. Storage enforces the
//! unique constraints; a violation reported at commit time is turned into the
//! same `Conflict` the pre-check would have produced.

use chrono::Utc;
use thiserror::Error;
use tracing::instrument;

use staffhub_auth::{authorize_role_assignment, AuthzError, PasswordHashError, PasswordHasher, Role};
use staffhub_core::{DomainError, DomainResult, EmployeeId};

use crate::dto::{CreateEmployeeRequest, EmployeeResponse, PhoneNumberRequest, UpdateEmployeeRequest};
use crate::employee::{Employee, RegisterEmployee};
use crate::projection::EmployeeProjector;
use crate::repository::{EmployeeRepository, RepositoryError, UniqueKey};

/// Coarse classification of a `ServiceError`, used by boundary layers to pick
/// a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    NotFound,
    Unauthorized,
    Internal,
}

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Raised by the aggregate and propagated unchanged.
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// Uniqueness violation detected by the service (pre-check or commit).
    #[error("{0}")]
    Conflict(String),

    /// No active employee with the requested id.
    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthzError),

    #[error(transparent)]
    Hashing(#[from] PasswordHashError),

    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl ServiceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ServiceError::Domain(e) => match e {
                DomainError::Validation(_) | DomainError::InvalidId(_) => ErrorKind::Validation,
                DomainError::Conflict(_) => ErrorKind::Conflict,
                DomainError::NotFound(_) => ErrorKind::NotFound,
                DomainError::Unauthorized(_) => ErrorKind::Unauthorized,
            },
            ServiceError::Conflict(_) => ErrorKind::Conflict,
            ServiceError::NotFound(_) => ErrorKind::NotFound,
            ServiceError::Unauthorized(_) => ErrorKind::Unauthorized,
            ServiceError::Hashing(_) | ServiceError::Repository(_) => ErrorKind::Internal,
        }
    }

    /// Message safe to show to the caller. Internal failures are not described.
    pub fn public_message(&self) -> String {
        match self {
            ServiceError::Domain(e) => e.message().to_string(),
            ServiceError::Conflict(msg) | ServiceError::NotFound(msg) => msg.clone(),
            ServiceError::Unauthorized(e) => e.to_string(),
            ServiceError::Hashing(_) | ServiceError::Repository(_) => {
                "An internal server error occurred.".to_string()
            }
        }
    }
}

fn doc_number_taken(doc_number: &str) -> String {
    format!("Employee with document number '{doc_number}' already exists.")
}

fn email_taken(email: &str) -> String {
    format!("Employee with email '{email}' already exists.")
}

fn email_in_use(email: &str) -> String {
    format!("Email '{email}' is already in use by another employee.")
}

fn employee_not_found(id: EmployeeId) -> ServiceError {
    ServiceError::NotFound(format!("Employee with ID '{id}' not found."))
}

/// Map a failed commit: unique violations become `Conflict`, anything else
/// passes through as a repository failure.
fn commit_error(
    err: RepositoryError,
    conflict_message: impl FnOnce(Option<UniqueKey>, String) -> String,
) -> ServiceError {
    match err {
        RepositoryError::UniqueViolation { key, detail } => {
            tracing::warn!(?key, %detail, "commit rejected by unique constraint");
            ServiceError::Conflict(conflict_message(key, detail))
        }
        other => ServiceError::Repository(other),
    }
}

fn to_phones(phones: &[PhoneNumberRequest]) -> DomainResult<Vec<crate::PhoneNumber>> {
    phones.iter().map(PhoneNumberRequest::to_phone).collect()
}

/// Orchestrates the employee use cases over the persistence, password-hashing
/// and projection ports.
///
/// One instance wraps one unit of work; build a fresh one per request.
pub struct EmployeeService<R, H, P> {
    repository: R,
    hasher: H,
    projector: P,
}

impl<R, H, P> EmployeeService<R, H, P>
where
    R: EmployeeRepository,
    H: PasswordHasher,
    P: EmployeeProjector,
{
    pub fn new(repository: R, hasher: H, projector: P) -> Self {
        Self {
            repository,
            hasher,
            projector,
        }
    }

    /// Create an employee.
    ///
    /// When `requester_role` is given, the requester may not assign a role
    /// above its own. Checks run in order: role, doc number, email.
    #[instrument(skip_all, fields(email = %input.email, role = %input.role))]
    pub async fn create_employee(
        &self,
        input: CreateEmployeeRequest,
        requester_role: Option<Role>,
    ) -> Result<EmployeeResponse, ServiceError> {
        if let Some(requester) = requester_role {
            authorize_role_assignment(requester, input.role)?;
        }

        if self.repository.exists_by_doc_number(&input.doc_number).await? {
            return Err(ServiceError::Conflict(doc_number_taken(&input.doc_number)));
        }
        if self.repository.exists_by_email(&input.email).await? {
            return Err(ServiceError::Conflict(email_taken(&input.email)));
        }

        let password_hash = self.hasher.hash(&input.password)?;
        let doc_number = input.doc_number.clone();
        let email = input.email.clone();

        let mut employee = Employee::register(RegisterEmployee {
            first_name: input.first_name,
            last_name: input.last_name,
            email: input.email,
            doc_number: input.doc_number,
            date_of_birth: input.date_of_birth,
            password_hash,
            manager_name: input.manager_name,
            role: input.role,
            occurred_at: Utc::now(),
        })?;
        for phone in to_phones(&input.phones)? {
            employee.add_phone(phone)?;
        }

        let response = self.projector.project(&employee);

        self.repository.add_one(employee).await?;
        self.repository
            .commit()
            .await
            .map_err(|e| {
                commit_error(e, |key, detail| match key {
                    Some(UniqueKey::DocNumber) => doc_number_taken(&doc_number),
                    Some(UniqueKey::Email) => email_taken(&email),
                    None => detail,
                })
            })?;

        tracing::info!(employee_id = %response.id, "employee created");
        Ok(response)
    }

    /// Active employee by id; `None` when absent or deactivated.
    #[instrument(skip(self))]
    pub async fn get_employee_by_id(
        &self,
        id: EmployeeId,
    ) -> Result<Option<EmployeeResponse>, ServiceError> {
        let employee = self.repository.find_by_id(id).await?;
        Ok(employee.map(|e| self.projector.project(&e)))
    }

    #[instrument(skip(self))]
    pub async fn get_all_employees(&self) -> Result<Vec<EmployeeResponse>, ServiceError> {
        let employees = self.repository.find_all().await?;
        Ok(employees.iter().map(|e| self.projector.project(e)).collect())
    }

    /// Update personal details and replace the whole phone list.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn update_employee(
        &self,
        id: EmployeeId,
        input: UpdateEmployeeRequest,
    ) -> Result<(), ServiceError> {
        let mut employee = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| employee_not_found(id))?;

        if input.email != employee.email() && self.repository.exists_by_email(&input.email).await? {
            return Err(ServiceError::Conflict(email_in_use(&input.email)));
        }

        let email = input.email.clone();

        employee.update_details(
            input.first_name,
            input.last_name,
            input.email,
            input.manager_name,
        )?;
        employee.replace_phones(to_phones(&input.phones)?)?;

        self.repository.mark_updated(employee).await?;
        self.repository.commit().await.map_err(|e| {
            commit_error(e, |key, detail| match key {
                Some(UniqueKey::Email) => email_in_use(&email),
                _ => detail,
            })
        })?;

        tracing::info!(employee_id = %id, "employee updated");
        Ok(())
    }

    /// Soft delete: deactivate and keep the record.
    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: EmployeeId) -> Result<(), ServiceError> {
        let mut employee = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| employee_not_found(id))?;

        employee.deactivate()?;

        self.repository.mark_updated(employee).await?;
        self.repository.commit().await?;

        tracing::info!(employee_id = %id, "employee deactivated");
        Ok(())
    }
}
