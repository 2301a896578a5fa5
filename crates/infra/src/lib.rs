//! Infrastructure layer: configuration and persistence adapters.

pub mod config;
pub mod repository;

#[cfg(test)]
mod integration_tests;

pub use config::{AppConfig, ConfigError, DatabaseConfig};
pub use repository::{
    connect, run_migrations, InMemoryEmployeeRepository, InMemoryEmployeeStore,
    PostgresEmployeeRepository,
};
