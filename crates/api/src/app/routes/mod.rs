use axum::Router;

pub mod employees;
pub mod system;

pub const EMPLOYEES_PATH: &str = "/api/employees";

/// Router for all API endpoints.
pub fn router() -> Router {
    Router::new().nest(EMPLOYEES_PATH, employees::router())
}
