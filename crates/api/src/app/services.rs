use std::sync::Arc;

use anyhow::Context;
use sqlx::PgPool;

use staffhub_auth::Argon2PasswordHasher;
use staffhub_employees::{EmployeeRepository, EmployeeService, ResponseProjector};
use staffhub_infra::{
    connect, run_migrations, AppConfig, ConfigError, InMemoryEmployeeStore,
    PostgresEmployeeRepository,
};

/// Employee service as seen by the handlers; storage is chosen at startup.
pub type EmployeeServiceHandle =
    EmployeeService<Arc<dyn EmployeeRepository>, Argon2PasswordHasher, ResponseProjector>;

/// Shared, long-lived state. Only the storage backend is shared; every request
/// gets its own unit of work from [`AppServices::employees`].
pub enum AppServices {
    InMemory { store: InMemoryEmployeeStore },
    Persistent { pool: PgPool },
}

impl AppServices {
    pub fn in_memory() -> Self {
        AppServices::InMemory {
            store: InMemoryEmployeeStore::new(),
        }
    }

    pub fn persistent(pool: PgPool) -> Self {
        AppServices::Persistent { pool }
    }

    pub fn mode(&self) -> &'static str {
        match self {
            AppServices::InMemory { .. } => "in_memory",
            AppServices::Persistent { .. } => "persistent",
        }
    }

    /// A service over a fresh unit of work.
    pub fn employees(&self) -> EmployeeServiceHandle {
        let repository: Arc<dyn EmployeeRepository> = match self {
            AppServices::InMemory { store } => Arc::new(store.repository()),
            AppServices::Persistent { pool } => {
                Arc::new(PostgresEmployeeRepository::new(pool.clone()))
            }
        };
        EmployeeService::new(repository, Argon2PasswordHasher::new(), ResponseProjector)
    }
}

pub async fn build_services(config: &AppConfig) -> anyhow::Result<AppServices> {
    if !config.use_persistent_stores {
        tracing::info!("using in-memory employee store");
        return Ok(AppServices::in_memory());
    }

    let database = config
        .database
        .as_ref()
        .ok_or(ConfigError::Missing("DATABASE_URL"))?;

    let pool = connect(database)
        .await
        .context("failed to connect to Postgres")?;
    run_migrations(&pool)
        .await
        .context("failed to apply database migrations")?;

    tracing::info!(
        max_connections = database.max_connections,
        "using Postgres employee store"
    );
    Ok(AppServices::persistent(pool))
}
