use std::collections::BTreeMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use staffhub_core::EmployeeId;
use staffhub_employees::{Employee, EmployeeRepository, RepositoryError, UniqueKey};

use super::{Staged, StagedChanges};

type Records = BTreeMap<EmployeeId, Employee>;

/// Committed employee records for dev/test, shared by every repository built
/// from it. Keyed by the time-ordered id.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEmployeeStore {
    inner: Arc<RwLock<Records>>,
}

impl InMemoryEmployeeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a fresh unit of work over this store.
    pub fn repository(&self) -> InMemoryEmployeeRepository {
        InMemoryEmployeeRepository {
            store: self.clone(),
            staged: StagedChanges::default(),
        }
    }

    /// Number of stored records, active or not.
    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<T>(&self, f: impl FnOnce(&Records) -> T) -> Result<T, RepositoryError> {
        let map = self
            .inner
            .read()
            .map_err(|_| RepositoryError::storage("read", "store lock poisoned"))?;
        Ok(f(&map))
    }
}

/// Unit-of-work repository over an [`InMemoryEmployeeStore`].
///
/// Changes are staged locally; `commit` validates them against the committed
/// records and applies all or none.
#[derive(Debug)]
pub struct InMemoryEmployeeRepository {
    store: InMemoryEmployeeStore,
    staged: StagedChanges,
}

impl InMemoryEmployeeRepository {
    pub fn new(store: InMemoryEmployeeStore) -> Self {
        store.repository()
    }
}

/// Enforce the storage-level unique constraints on `doc_number` and `email`,
/// ignoring the record being written itself.
fn check_unique(records: &Records, candidate: &Employee) -> Result<(), RepositoryError> {
    let others = records
        .values()
        .filter(|e| e.id_typed() != candidate.id_typed());

    for existing in others {
        if existing.doc_number() == candidate.doc_number() {
            return Err(RepositoryError::UniqueViolation {
                key: Some(UniqueKey::DocNumber),
                detail: format!("doc_number '{}' already stored", candidate.doc_number()),
            });
        }
        if existing.email() == candidate.email() {
            return Err(RepositoryError::UniqueViolation {
                key: Some(UniqueKey::Email),
                detail: format!("email '{}' already stored", candidate.email()),
            });
        }
    }
    Ok(())
}

#[async_trait]
impl EmployeeRepository for InMemoryEmployeeRepository {
    async fn add_one(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.staged.push(Staged::Insert(employee))
    }

    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        self.store
            .read(|m| m.get(&id).filter(|e| e.is_active()).cloned())
    }

    async fn find_by_doc_number(
        &self,
        doc_number: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        self.store.read(|m| {
            m.values()
                .find(|e| e.is_active() && e.doc_number() == doc_number)
                .cloned()
        })
    }

    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        self.store
            .read(|m| m.values().filter(|e| e.is_active()).cloned().collect())
    }

    async fn mark_updated(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.staged.push(Staged::Update(employee))
    }

    async fn exists_by_doc_number(&self, doc_number: &str) -> Result<bool, RepositoryError> {
        self.store
            .read(|m| m.values().any(|e| e.doc_number() == doc_number))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        self.store.read(|m| m.values().any(|e| e.email() == email))
    }

    async fn commit(&self) -> Result<usize, RepositoryError> {
        let changes = self.staged.take()?;
        if changes.is_empty() {
            return Ok(0);
        }

        let mut map = self
            .store
            .inner
            .write()
            .map_err(|_| RepositoryError::storage("commit", "store lock poisoned"))?;

        // Apply to a copy so a failure part-way leaves the store untouched.
        let mut working = map.clone();
        for change in &changes {
            match change {
                Staged::Insert(employee) => {
                    if working.contains_key(&employee.id_typed()) {
                        return Err(RepositoryError::UniqueViolation {
                            key: None,
                            detail: format!("employee {} already stored", employee.id_typed()),
                        });
                    }
                    check_unique(&working, employee)?;
                    working.insert(employee.id_typed(), employee.clone());
                }
                Staged::Update(employee) => {
                    if !working.contains_key(&employee.id_typed()) {
                        return Err(RepositoryError::Missing(employee.id_typed()));
                    }
                    check_unique(&working, employee)?;
                    working.insert(employee.id_typed(), employee.clone());
                }
            }
        }

        *map = working;
        tracing::debug!(written = changes.len(), "in-memory commit applied");
        Ok(changes.len())
    }
}
