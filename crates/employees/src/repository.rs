//! Persistence port for the employee aggregate.
//!
//! A repository instance is a unit of work: `add_one` and `mark_updated` only
//! stage changes, and `commit` applies everything staged atomically. Staged
//! changes are not visible to reads (on this or any other instance) until a
//! commit succeeds; a failed commit applies nothing.

use async_trait::async_trait;
use thiserror::Error;

use staffhub_core::EmployeeId;

use crate::employee::Employee;

/// Field protected by a storage-level unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniqueKey {
    DocNumber,
    Email,
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    /// A unique constraint rejected the commit (concurrent writer won the race).
    #[error("unique constraint violated ({key:?}): {detail}")]
    UniqueViolation {
        key: Option<UniqueKey>,
        detail: String,
    },

    /// An update was staged for a record that is not stored.
    #[error("employee {0} is not stored")]
    Missing(EmployeeId),

    /// Stored data could not be turned back into an aggregate.
    #[error("corrupt employee record: {0}")]
    Corrupt(String),

    /// Storage backend failure (connection, query, transaction).
    #[error("storage error in {operation}: {message}")]
    Storage {
        operation: &'static str,
        message: String,
    },
}

impl RepositoryError {
    pub fn storage(operation: &'static str, message: impl Into<String>) -> Self {
        Self::Storage {
            operation,
            message: message.into(),
        }
    }
}

/// Employee persistence port.
///
/// All `find_*` methods return active employees only. The `exists_*` checks
/// cover every stored record, active or not, matching the storage-level
/// unique constraints on `doc_number` and `email`.
#[async_trait]
pub trait EmployeeRepository: Send + Sync {
    /// Stage a new employee for insertion.
    async fn add_one(&self, employee: Employee) -> Result<(), RepositoryError>;

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError>;

    async fn find_by_doc_number(
        &self,
        doc_number: &str,
    ) -> Result<Option<Employee>, RepositoryError>;

    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError>;

    /// Stage the new state of an already stored employee.
    async fn mark_updated(&self, employee: Employee) -> Result<(), RepositoryError>;

    async fn exists_by_doc_number(&self, doc_number: &str) -> Result<bool, RepositoryError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError>;

    /// Apply every staged change atomically; returns the number of records written.
    async fn commit(&self) -> Result<usize, RepositoryError>;
}

#[async_trait]
impl<R> EmployeeRepository for std::sync::Arc<R>
where
    R: EmployeeRepository + ?Sized,
{
    async fn add_one(&self, employee: Employee) -> Result<(), RepositoryError> {
        (**self).add_one(employee).await
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        (**self).find_by_id(id).await
    }

    async fn find_by_doc_number(
        &self,
        doc_number: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        (**self).find_by_doc_number(doc_number).await
    }

    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        (**self).find_all().await
    }

    async fn mark_updated(&self, employee: Employee) -> Result<(), RepositoryError> {
        (**self).mark_updated(employee).await
    }

    async fn exists_by_doc_number(&self, doc_number: &str) -> Result<bool, RepositoryError> {
        (**self).exists_by_doc_number(doc_number).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        (**self).exists_by_email(email).await
    }

    async fn commit(&self) -> Result<usize, RepositoryError> {
        (**self).commit().await
    }
}
