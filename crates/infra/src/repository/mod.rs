//! Adapters for the `EmployeeRepository` port.

pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryEmployeeRepository, InMemoryEmployeeStore};
pub use postgres::{connect, run_migrations, PostgresEmployeeRepository};

use std::sync::Mutex;

use staffhub_employees::{Employee, RepositoryError};

/// A change waiting for `commit`.
#[derive(Debug, Clone)]
enum Staged {
    Insert(Employee),
    Update(Employee),
}

/// Pending changes of one unit of work.
#[derive(Debug, Default)]
struct StagedChanges {
    inner: Mutex<Vec<Staged>>,
}

impl StagedChanges {
    fn push(&self, change: Staged) -> Result<(), RepositoryError> {
        self.inner
            .lock()
            .map_err(|_| RepositoryError::storage("stage", "staging lock poisoned"))?
            .push(change);
        Ok(())
    }

    /// Remove and return everything staged so far.
    fn take(&self) -> Result<Vec<Staged>, RepositoryError> {
        let mut guard = self
            .inner
            .lock()
            .map_err(|_| RepositoryError::storage("commit", "staging lock poisoned"))?;
        Ok(std::mem::take(&mut *guard))
    }
}
