//! Employee aggregate.
//!
//! Fields are private; every mutation goes through a method that re-checks
//! the invariants it touches. Construction either yields a fully valid
//! aggregate or an error, never a partially built one.

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use staffhub_auth::Role;
use staffhub_core::{AggregateRoot, DomainError, DomainResult, EmployeeId};

use crate::phone::PhoneNumber;

/// Minimum age (in whole years) at registration.
pub const MINIMUM_AGE: i32 = 18;

/// Whole years between `date_of_birth` and `today`.
///
/// Calendar-year difference, minus one when the birthday has not yet occurred
/// in `today`'s year. A 29 February birthday counts as reached on 1 March in
/// non-leap years.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - date_of_birth.year();
    if (today.month(), today.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Command: register a new employee.
///
/// `password_hash` must already be hashed; the aggregate never sees plaintext.
/// `occurred_at` is the instant the age rule is evaluated against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegisterEmployee {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub password_hash: String,
    pub manager_name: Option<String>,
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Persisted state of an employee, as read back from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeSnapshot {
    pub id: EmployeeId,
    pub is_active: bool,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub password_hash: String,
    pub manager_name: Option<String>,
    pub role: Role,
    pub phones: Vec<PhoneNumber>,
}

/// Aggregate root: Employee.
///
/// # Invariants
/// - first/last name, email, doc number and password hash are never blank.
/// - Age was at least [`MINIMUM_AGE`] at registration.
/// - `doc_number` never changes after registration.
/// - No two phones with the same `(number, kind)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Employee {
    id: EmployeeId,
    is_active: bool,
    first_name: String,
    last_name: String,
    email: String,
    doc_number: String,
    date_of_birth: NaiveDate,
    password_hash: String,
    manager_name: Option<String>,
    role: Role,
    phones: Vec<PhoneNumber>,
}

fn require(value: &str, message: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(message));
    }
    Ok(())
}

impl Employee {
    /// Register a new, active employee with no phones.
    pub fn register(cmd: RegisterEmployee) -> DomainResult<Self> {
        require(&cmd.first_name, "First name is required.")?;
        require(&cmd.last_name, "Last name is required.")?;
        require(&cmd.email, "Email is required.")?;
        require(&cmd.doc_number, "Document number is required.")?;
        require(&cmd.password_hash, "Password hash is required.")?;

        if age_on(cmd.date_of_birth, cmd.occurred_at.date_naive()) < MINIMUM_AGE {
            return Err(DomainError::validation(
                "Employee must be at least 18 years old.",
            ));
        }

        Ok(Self {
            id: EmployeeId::new(),
            is_active: true,
            first_name: cmd.first_name,
            last_name: cmd.last_name,
            email: cmd.email,
            doc_number: cmd.doc_number,
            date_of_birth: cmd.date_of_birth,
            password_hash: cmd.password_hash,
            manager_name: cmd.manager_name,
            role: cmd.role,
            phones: Vec::new(),
        })
    }

    /// Rebuild an aggregate from persisted state.
    ///
    /// Storage adapters only. The state was validated when it was first written,
    /// so the age rule is not re-evaluated against today's date.
    pub fn from_snapshot(snapshot: EmployeeSnapshot) -> Self {
        Self {
            id: snapshot.id,
            is_active: snapshot.is_active,
            first_name: snapshot.first_name,
            last_name: snapshot.last_name,
            email: snapshot.email,
            doc_number: snapshot.doc_number,
            date_of_birth: snapshot.date_of_birth,
            password_hash: snapshot.password_hash,
            manager_name: snapshot.manager_name,
            role: snapshot.role,
            phones: snapshot.phones,
        }
    }

    /// Persistable copy of the current state.
    pub fn snapshot(&self) -> EmployeeSnapshot {
        EmployeeSnapshot {
            id: self.id,
            is_active: self.is_active,
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            doc_number: self.doc_number.clone(),
            date_of_birth: self.date_of_birth,
            password_hash: self.password_hash.clone(),
            manager_name: self.manager_name.clone(),
            role: self.role,
            phones: self.phones.clone(),
        }
    }

    pub fn id_typed(&self) -> EmployeeId {
        self.id
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn doc_number(&self) -> &str {
        &self.doc_number
    }

    pub fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }

    pub fn manager_name(&self) -> Option<&str> {
        self.manager_name.as_deref()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Read-only view of the owned phones, in insertion order.
    pub fn phones(&self) -> &[PhoneNumber] {
        &self.phones
    }

    pub fn add_phone(&mut self, phone: PhoneNumber) -> DomainResult<()> {
        if self.phones.contains(&phone) {
            return Err(DomainError::conflict(
                "This phone number already exists for the employee.",
            ));
        }
        self.phones.push(phone);
        Ok(())
    }

    pub fn remove_phone(&mut self, phone: &PhoneNumber) -> DomainResult<()> {
        match self.phones.iter().position(|p| p == phone) {
            Some(index) => {
                self.phones.remove(index);
                Ok(())
            }
            None => Err(DomainError::not_found(
                "Phone number not found for this employee.",
            )),
        }
    }

    /// Replace the whole phone list: remove every current phone, then add the
    /// new ones in order.
    ///
    /// Duplicates inside `phones` fail with `Conflict`, and the previous list
    /// is restored.
    pub fn replace_phones(
        &mut self,
        phones: impl IntoIterator<Item = PhoneNumber>,
    ) -> DomainResult<()> {
        let previous = self.phones.clone();

        for phone in &previous {
            self.remove_phone(phone)?;
        }

        for phone in phones {
            if let Err(e) = self.add_phone(phone) {
                self.phones = previous;
                return Err(e);
            }
        }

        Ok(())
    }

    /// Overwrite the mutable personal details.
    ///
    /// `doc_number`, `date_of_birth`, `password_hash`, `role` and the
    /// activation flag are untouched.
    pub fn update_details(
        &mut self,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        email: impl Into<String>,
        manager_name: Option<String>,
    ) -> DomainResult<()> {
        let first_name = first_name.into();
        let last_name = last_name.into();
        let email = email.into();

        require(&first_name, "First name is required.")?;
        require(&last_name, "Last name is required.")?;
        require(&email, "Email is required.")?;

        self.first_name = first_name;
        self.last_name = last_name;
        self.email = email;
        self.manager_name = manager_name;
        Ok(())
    }

    pub fn deactivate(&mut self) -> DomainResult<()> {
        if !self.is_active {
            return Err(DomainError::conflict("Employee is already deactivated."));
        }
        self.is_active = false;
        Ok(())
    }

    pub fn activate(&mut self) -> DomainResult<()> {
        if self.is_active {
            return Err(DomainError::conflict("Employee is already active."));
        }
        self.is_active = true;
        Ok(())
    }
}

impl AggregateRoot for Employee {
    type Id = EmployeeId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
