use staffhub_core::{DomainError, DomainResult, ValueObject};

/// Phone number owned by an employee.
///
/// Compared structurally over `(number, kind)`; two equal instances are
/// interchangeable.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber {
    number: String,
    kind: String,
}

impl PhoneNumber {
    pub fn new(number: impl Into<String>, kind: impl Into<String>) -> DomainResult<Self> {
        let number = number.into();
        let kind = kind.into();

        if number.trim().is_empty() {
            return Err(DomainError::validation("Phone number cannot be empty."));
        }
        if kind.trim().is_empty() {
            return Err(DomainError::validation("Phone type cannot be empty."));
        }

        Ok(Self { number, kind })
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// Free-form label such as "Mobile" or "Home".
    pub fn kind(&self) -> &str {
        &self.kind
    }
}

impl ValueObject for PhoneNumber {}

impl core::fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}: {}", self.kind, self.number)
    }
}
