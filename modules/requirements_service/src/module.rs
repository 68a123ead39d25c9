//! Module wiring and lifecycle: connect, migrate, build the service, expose routes

use crate::config::Config;
use crate::domain::{AuthSettings, Repositories, Service};
use crate::infra::storage::{
    Migrator, SeaOrmDocumentRepository, SeaOrmDomainRepository, SeaOrmFeatureRepository,
    SeaOrmLoginAttemptRepository, SeaOrmProjectRepository, SeaOrmRequirementRepository,
    SeaOrmUserRepository,
};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use std::sync::Arc;

/// Open a connection pool
///
/// In-memory SQLite is pinned to one connection so every query sees the same database.
pub async fn connect(url: &str, max_connections: u32) -> Result<DatabaseConnection> {
    let mut opts = ConnectOptions::new(url.to_string());
    if url.starts_with("sqlite::memory:") || url.contains("mode=memory") {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(max_connections);
    }
    opts.sqlx_logging(false);

    Database::connect(opts)
        .await
        .with_context(|| format!("failed to connect to database {}", redact(url)))
}

fn redact(url: &str) -> String {
    match (url.find("://"), url.rfind('@')) {
        (Some(scheme), Some(at)) if at > scheme => format!("{}://***{}", &url[..scheme], &url[at..]),
        _ => url.to_string(),
    }
}

/// Requirements service module
pub struct RequirementsServiceModule {
    config: Config,
    db: Arc<DatabaseConnection>,
    service: Arc<Service>,
}

impl RequirementsServiceModule {
    /// Run migrations and build the domain service on top of `db`
    pub async fn init(config: Config, db: DatabaseConnection) -> Result<Self> {
        let auth = AuthSettings::from_config(&config).context("invalid requirements_service config")?;
        Self::migrate(&db).await?;

        let db = Arc::new(db);
        let repos = Repositories {
            users: Arc::new(SeaOrmUserRepository::new(db.clone())),
            login_attempts: Arc::new(SeaOrmLoginAttemptRepository::new(db.clone())),
            projects: Arc::new(SeaOrmProjectRepository::new(db.clone())),
            documents: Arc::new(SeaOrmDocumentRepository::new(db.clone())),
            domains: Arc::new(SeaOrmDomainRepository::new(db.clone())),
            features: Arc::new(SeaOrmFeatureRepository::new(db.clone())),
            requirements: Arc::new(SeaOrmRequirementRepository::new(db.clone())),
        };
        let service = Arc::new(Service::new(repos, auth));

        tracing::info!(project = %config.project_name, "Requirements service initialized");
        Ok(Self {
            config,
            db,
            service,
        })
    }

    pub async fn migrate(db: &DatabaseConnection) -> Result<()> {
        Migrator::up(db, None)
            .await
            .context("requirements service migrations failed")?;
        tracing::info!("Requirements service migrations completed");
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    pub fn db(&self) -> Arc<DatabaseConnection> {
        self.db.clone()
    }

    /// Mount the REST API onto `router`
    pub fn register_rest(&self, router: axum::Router) -> axum::Router {
        tracing::info!(prefix = %self.config.api_prefix, "Registering requirements service REST routes");
        crate::api::rest::register_routes(router, self.service.clone(), &self.config)
    }
}
