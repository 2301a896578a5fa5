use thiserror::Error;

use staffhub_core::DomainError;

use crate::Role;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    #[error("You cannot create a user with higher permissions than your own.")]
    RoleEscalation { requester: Role, requested: Role },
}

impl From<AuthzError> for DomainError {
    fn from(value: AuthzError) -> Self {
        DomainError::unauthorized(value.to_string())
    }
}

/// Check that `requester` may assign `requested` to a new account.
///
/// - No IO
/// - No panics
/// - Pure policy check over the role hierarchy
pub fn authorize_role_assignment(requester: Role, requested: Role) -> Result<(), AuthzError> {
    if requester.can_assign(requested) {
        Ok(())
    } else {
        tracing::debug!(%requester, %requested, "role escalation refused");
        Err(AuthzError::RoleEscalation {
            requester,
            requested,
        })
    }
}
