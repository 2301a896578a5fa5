//! Postgres-backed employee repository.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | RepositoryError |
//! |------------|----------------------|-----------------|
//! | Database (unique violation) | `23505` | `UniqueViolation` (key from the constraint name) |
//! | Database (other) | Any other | `Storage` |
//! | PoolClosed | N/A | `Storage` |
//! | Other | N/A | `Storage` |
//!
//! ## Commit
//!
//! Everything staged on one repository is written in a single transaction:
//! employee rows are inserted or updated and the phone rows of each touched
//! employee are replaced. Any error rolls the whole batch back.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::instrument;
use uuid::Uuid;

use staffhub_auth::Role;
use staffhub_core::EmployeeId;
use staffhub_employees::{
    Employee, EmployeeRepository, EmployeeSnapshot, PhoneNumber, RepositoryError, UniqueKey,
};

use super::{Staged, StagedChanges};
use crate::config::DatabaseConfig;

/// Open a connection pool for the configured database.
pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(5))
        .connect(&config.url)
        .await
}

/// Apply the embedded schema migrations (idempotent).
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}

const EMPLOYEE_COLUMNS: &str = r#"
    id, first_name, last_name, email, doc_number, date_of_birth,
    password_hash, manager_name, role, is_active
"#;

/// Unit-of-work repository over a shared pool. Build one per request.
#[derive(Debug)]
pub struct PostgresEmployeeRepository {
    pool: PgPool,
    staged: StagedChanges,
}

impl PostgresEmployeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            staged: StagedChanges::default(),
        }
    }

    /// Phones of the given employees, in stored order.
    async fn load_phones(
        &self,
        ids: &[Uuid],
    ) -> Result<HashMap<Uuid, Vec<PhoneNumber>>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT employee_id, number, type
            FROM employee_phones
            WHERE employee_id = ANY($1)
            ORDER BY employee_id, position ASC
            "#,
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| map_sqlx_error("load_phones", e))?;

        let mut phones: HashMap<Uuid, Vec<PhoneNumber>> = HashMap::new();
        for row in rows {
            let employee_id: Uuid = row.try_get("employee_id").map_err(corrupt)?;
            let number: String = row.try_get("number").map_err(corrupt)?;
            let kind: String = row.try_get("type").map_err(corrupt)?;
            let phone = PhoneNumber::new(number, kind)
                .map_err(|e| RepositoryError::Corrupt(format!("phone of {employee_id}: {e}")))?;
            phones.entry(employee_id).or_default().push(phone);
        }
        Ok(phones)
    }

    /// Turn employee rows into aggregates, attaching their phones.
    async fn hydrate(&self, rows: Vec<PgRow>) -> Result<Vec<Employee>, RepositoryError> {
        let records = rows
            .iter()
            .map(EmployeeRow::from_row)
            .collect::<Result<Vec<_>, _>>()?;
        if records.is_empty() {
            return Ok(vec![]);
        }

        let ids: Vec<Uuid> = records.iter().map(|r| r.id).collect();
        let mut phones = self.load_phones(&ids).await?;

        records
            .into_iter()
            .map(|r| {
                let own = phones.remove(&r.id).unwrap_or_default();
                r.into_employee(own)
            })
            .collect()
    }

    async fn fetch_where(
        &self,
        operation: &'static str,
        condition: &str,
        bind: Option<&str>,
        id: Option<Uuid>,
    ) -> Result<Vec<Employee>, RepositoryError> {
        let sql = format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE is_active AND {condition} ORDER BY created_at ASC, id ASC"
        );
        let mut query = sqlx::query(&sql);
        if let Some(id) = id {
            query = query.bind(id);
        }
        if let Some(value) = bind {
            query = query.bind(value);
        }
        let rows = query
            .fetch_all(&self.pool)
            .await
            .map_err(|e| map_sqlx_error(operation, e))?;
        self.hydrate(rows).await
    }

    async fn exists(&self, column: &'static str, value: &str) -> Result<bool, RepositoryError> {
        let sql = format!("SELECT EXISTS (SELECT 1 FROM employees WHERE {column} = $1) AS found");
        let row = sqlx::query(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_sqlx_error("exists", e))?;
        row.try_get("found").map_err(corrupt)
    }
}

#[async_trait]
impl EmployeeRepository for PostgresEmployeeRepository {
    async fn add_one(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.staged.push(Staged::Insert(employee))
    }

    #[instrument(skip(self), err)]
    async fn find_by_id(&self, id: EmployeeId) -> Result<Option<Employee>, RepositoryError> {
        let mut found = self
            .fetch_where("find_by_id", "id = $1", None, Some(*id.as_uuid()))
            .await?;
        Ok(found.pop())
    }

    #[instrument(skip(self), err)]
    async fn find_by_doc_number(
        &self,
        doc_number: &str,
    ) -> Result<Option<Employee>, RepositoryError> {
        let mut found = self
            .fetch_where("find_by_doc_number", "doc_number = $1", Some(doc_number), None)
            .await?;
        Ok(found.pop())
    }

    #[instrument(skip(self), err)]
    async fn find_all(&self) -> Result<Vec<Employee>, RepositoryError> {
        self.fetch_where("find_all", "TRUE", None, None).await
    }

    async fn mark_updated(&self, employee: Employee) -> Result<(), RepositoryError> {
        self.staged.push(Staged::Update(employee))
    }

    async fn exists_by_doc_number(&self, doc_number: &str) -> Result<bool, RepositoryError> {
        self.exists("doc_number", doc_number).await
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, RepositoryError> {
        self.exists("email", email).await
    }

    #[instrument(skip(self), err)]
    async fn commit(&self) -> Result<usize, RepositoryError> {
        let changes = self.staged.take()?;
        if changes.is_empty() {
            return Ok(0);
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        // Dropping `tx` on an early return rolls back.
        for change in &changes {
            match change {
                Staged::Insert(employee) => insert_employee(&mut tx, employee).await?,
                Staged::Update(employee) => update_employee(&mut tx, employee).await?,
            }
            replace_phones(&mut tx, employee_of(change)).await?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        tracing::debug!(written = changes.len(), "postgres commit applied");
        Ok(changes.len())
    }
}

fn employee_of(change: &Staged) -> &Employee {
    match change {
        Staged::Insert(e) | Staged::Update(e) => e,
    }
}

async fn insert_employee(
    tx: &mut Transaction<'_, Postgres>,
    employee: &Employee,
) -> Result<(), RepositoryError> {
    sqlx::query(
        r#"
        INSERT INTO employees (
            id, first_name, last_name, email, doc_number, date_of_birth,
            password_hash, manager_name, role, is_active
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(employee.id_typed().as_uuid())
    .bind(employee.first_name())
    .bind(employee.last_name())
    .bind(employee.email())
    .bind(employee.doc_number())
    .bind(employee.date_of_birth())
    .bind(employee.password_hash())
    .bind(employee.manager_name())
    .bind(employee.role().as_str())
    .bind(employee.is_active())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("insert_employee", e))?;
    Ok(())
}

async fn update_employee(
    tx: &mut Transaction<'_, Postgres>,
    employee: &Employee,
) -> Result<(), RepositoryError> {
    // doc_number, date_of_birth and password_hash never change after creation.
    let result = sqlx::query(
        r#"
        UPDATE employees
        SET first_name = $2,
            last_name = $3,
            email = $4,
            manager_name = $5,
            role = $6,
            is_active = $7,
            updated_at = NOW()
        WHERE id = $1
        "#,
    )
    .bind(employee.id_typed().as_uuid())
    .bind(employee.first_name())
    .bind(employee.last_name())
    .bind(employee.email())
    .bind(employee.manager_name())
    .bind(employee.role().as_str())
    .bind(employee.is_active())
    .execute(&mut **tx)
    .await
    .map_err(|e| map_sqlx_error("update_employee", e))?;

    if result.rows_affected() == 0 {
        return Err(RepositoryError::Missing(employee.id_typed()));
    }
    Ok(())
}

async fn replace_phones(
    tx: &mut Transaction<'_, Postgres>,
    employee: &Employee,
) -> Result<(), RepositoryError> {
    let id = employee.id_typed();

    sqlx::query("DELETE FROM employee_phones WHERE employee_id = $1")
        .bind(id.as_uuid())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("delete_phones", e))?;

    for (position, phone) in employee.phones().iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO employee_phones (employee_id, position, number, type)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(id.as_uuid())
        .bind(position as i32)
        .bind(phone.number())
        .bind(phone.kind())
        .execute(&mut **tx)
        .await
        .map_err(|e| map_sqlx_error("insert_phone", e))?;
    }
    Ok(())
}

/// Unique constraint name → protected field.
fn unique_key_for(constraint: &str) -> Option<UniqueKey> {
    match constraint {
        "employees_doc_number_key" => Some(UniqueKey::DocNumber),
        "employees_email_key" => Some(UniqueKey::Email),
        _ => None,
    }
}

fn map_sqlx_error(operation: &'static str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return RepositoryError::UniqueViolation {
                    key: db_err.constraint().and_then(unique_key_for),
                    detail: db_err.message().to_string(),
                };
            }
            RepositoryError::storage(operation, format!("database error: {}", db_err.message()))
        }
        sqlx::Error::PoolClosed => RepositoryError::storage(operation, "connection pool closed"),
        other => RepositoryError::storage(operation, other.to_string()),
    }
}

fn corrupt(err: sqlx::Error) -> RepositoryError {
    RepositoryError::Corrupt(err.to_string())
}

// SQLx row types

#[derive(Debug)]
struct EmployeeRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    doc_number: String,
    date_of_birth: NaiveDate,
    password_hash: String,
    manager_name: Option<String>,
    role: String,
    is_active: bool,
}

impl EmployeeRow {
    fn from_row(row: &PgRow) -> Result<Self, RepositoryError> {
        Ok(EmployeeRow {
            id: row.try_get("id").map_err(corrupt)?,
            first_name: row.try_get("first_name").map_err(corrupt)?,
            last_name: row.try_get("last_name").map_err(corrupt)?,
            email: row.try_get("email").map_err(corrupt)?,
            doc_number: row.try_get("doc_number").map_err(corrupt)?,
            date_of_birth: row.try_get("date_of_birth").map_err(corrupt)?,
            password_hash: row.try_get("password_hash").map_err(corrupt)?,
            manager_name: row.try_get("manager_name").map_err(corrupt)?,
            role: row.try_get("role").map_err(corrupt)?,
            is_active: row.try_get("is_active").map_err(corrupt)?,
        })
    }

    fn into_employee(self, phones: Vec<PhoneNumber>) -> Result<Employee, RepositoryError> {
        let role = Role::from_str(&self.role)
            .map_err(|e| RepositoryError::Corrupt(format!("employee {}: {e}", self.id)))?;

        Ok(Employee::from_snapshot(EmployeeSnapshot {
            id: EmployeeId::from_uuid(self.id),
            is_active: self.is_active,
            first_name: self.first_name,
            last_name: self.last_name,
            email: self.email,
            doc_number: self.doc_number,
            date_of_birth: self.date_of_birth,
            password_hash: self.password_hash,
            manager_name: self.manager_name,
            role,
            phones,
        }))
    }
}
