//! `staffhub-auth`: pure authorization and credential boundary.
//!
//! This crate is intentionally decoupled from HTTP and storage.

pub mod authorize;
pub mod password;
pub mod roles;

pub use authorize::{authorize_role_assignment, AuthzError};
pub use password::{Argon2PasswordHasher, PasswordHashError, PasswordHasher};
pub use roles::Role;
