//! Input and output shapes of the employee use cases.
//!
//! The `validator` rules are boundary checks (lengths, formats). The HTTP layer
//! runs them before calling the service; the aggregate only re-checks the
//! rules it owns (non-blank fields, minimum age).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use staffhub_auth::Role;
use staffhub_core::{DomainResult, EmployeeId};

use crate::phone::PhoneNumber;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PhoneNumberRequest {
    #[validate(length(min = 1, message = "Phone number is required."))]
    pub number: String,

    #[serde(rename = "type")]
    #[validate(length(
        min = 1,
        max = 50,
        message = "Phone type is required and cannot exceed 50 characters."
    ))]
    pub kind: String,
}

impl PhoneNumberRequest {
    pub fn new(number: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            kind: kind.into(),
        }
    }

    pub fn to_phone(&self) -> DomainResult<PhoneNumber> {
        PhoneNumber::new(self.number.clone(), self.kind.clone())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CreateEmployeeRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "First name is required and cannot exceed 100 characters."
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Last name is required and cannot exceed 100 characters."
    ))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format."))]
    pub email: String,

    #[validate(length(min = 5, message = "Document number must be at least 5 characters."))]
    pub doc_number: String,

    pub date_of_birth: NaiveDate,

    /// Plaintext; hashed by the service before it reaches the aggregate.
    #[validate(length(min = 8, message = "Password must be at least 8 characters long."))]
    pub password: String,

    #[serde(default)]
    #[validate(nested)]
    pub phones: Vec<PhoneNumberRequest>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Manager name cannot exceed 200 characters."))]
    pub manager_name: Option<String>,

    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct UpdateEmployeeRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "First name is required and cannot exceed 100 characters."
    ))]
    pub first_name: String,

    #[validate(length(
        min = 1,
        max = 100,
        message = "Last name is required and cannot exceed 100 characters."
    ))]
    pub last_name: String,

    #[validate(email(message = "Invalid email format."))]
    pub email: String,

    /// Accepted so clients can send the same shape as on create; an update
    /// never changes the date of birth.
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,

    #[serde(default)]
    #[validate(nested)]
    pub phones: Vec<PhoneNumberRequest>,

    #[serde(default)]
    #[validate(length(max = 200, message = "Manager name cannot exceed 200 characters."))]
    pub manager_name: Option<String>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumberResponse {
    pub number: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// External read shape of an employee. Never carries the password hash or the
/// activation flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeResponse {
    pub id: EmployeeId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub doc_number: String,
    pub date_of_birth: NaiveDate,
    pub role: Role,
    pub manager_name: Option<String>,
    pub phones: Vec<PhoneNumberResponse>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_create() -> CreateEmployeeRequest {
        CreateEmployeeRequest {
            first_name: "John".into(),
            last_name: "Doe".into(),
            email: "john.doe@test.com".into(),
            doc_number: "12345678900".into(),
            date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
            password: "password123".into(),
            phones: vec![PhoneNumberRequest::new("11987654321", "Mobile")],
            manager_name: None,
            role: Role::Employee,
        }
    }

    #[test]
    fn valid_create_request_passes_boundary_checks() {
        assert!(valid_create().validate().is_ok());
    }

    #[test]
    fn boundary_checks_flag_each_bad_field() {
        let mut req = valid_create();
        req.first_name = "x".repeat(101);
        req.email = "not-an-email".into();
        req.doc_number = "123".into();
        req.password = "short".into();
        req.manager_name = Some("m".repeat(201));

        let errors = req.validate().unwrap_err();
        let fields = errors.field_errors();
        for field in ["first_name", "email", "doc_number", "password", "manager_name"] {
            assert!(fields.contains_key(field), "missing error for {field}");
        }
    }

    #[test]
    fn nested_phone_rules_are_checked() {
        let mut req = valid_create();
        req.phones = vec![PhoneNumberRequest::new("", "Mobile")];
        assert!(req.validate().is_err());
    }

    #[test]
    fn create_request_reads_type_key_and_defaults_role() {
        let json = serde_json::json!({
            "first_name": "John",
            "last_name": "Doe",
            "email": "john.doe@test.com",
            "doc_number": "12345678900",
            "date_of_birth": "2000-01-01",
            "password": "password123",
            "phones": [{ "number": "11987654321", "type": "Mobile" }]
        });

        let req: CreateEmployeeRequest = serde_json::from_value(json).unwrap();
        assert_eq!(req.role, Role::Employee);
        assert_eq!(req.manager_name, None);
        assert_eq!(req.phones[0].kind, "Mobile");
    }
}
