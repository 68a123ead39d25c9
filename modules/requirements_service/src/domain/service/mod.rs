//! Domain service - business logic orchestration
//!
//! Operations are grouped per resource in the sibling files.

mod auth;
mod documents;
mod domains;
mod features;
mod projects;
mod requirements;

use crate::config::Config;
use crate::contract::{Owned, RequirementsError, User};
use crate::domain::permissions::PermissionChecker;
use crate::domain::repository::{
    DocumentRepository, DomainRepository, FeatureRepository, LoginAttemptRepository,
    ProjectRepository, RequirementRepository, UniqueViolation, UserRepository,
};
use crate::domain::security::TokenIssuer;
use chrono::Duration;
use std::sync::Arc;

/// Repository set the service runs against
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub login_attempts: Arc<dyn LoginAttemptRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub documents: Arc<dyn DocumentRepository>,
    pub domains: Arc<dyn DomainRepository>,
    pub features: Arc<dyn FeatureRepository>,
    pub requirements: Arc<dyn RequirementRepository>,
}

/// Authentication policy
#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub jwt_secret: String,
    pub access_token_lifetime: Duration,
    pub max_login_attempts: u64,
    pub lockout_window: Duration,
    pub password_hash_cost: u32,
}

impl AuthSettings {
    /// Convert minute counts into durations, rejecting values chrono cannot represent
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            jwt_secret: config.jwt_secret.clone(),
            access_token_lifetime: positive_minutes(
                "access_token_expire_minutes",
                config.access_token_expire_minutes,
            )?,
            max_login_attempts: config.max_login_attempts,
            lockout_window: positive_minutes("login_lockout_minutes", config.login_lockout_minutes)?,
            password_hash_cost: config.password_hash_cost,
        })
    }
}

fn positive_minutes(field: &str, minutes: i64) -> anyhow::Result<Duration> {
    anyhow::ensure!(minutes > 0, "{field} must be positive, got {minutes}");
    Duration::try_minutes(minutes)
        .ok_or_else(|| anyhow::anyhow!("{field} is out of range: {minutes}"))
}

/// Domain service for users and the requirement hierarchy
pub struct Service {
    repos: Repositories,
    auth: AuthSettings,
    tokens: TokenIssuer,
}

impl Service {
    /// Create a new service instance
    pub fn new(repos: Repositories, auth: AuthSettings) -> Self {
        if auth.jwt_secret == crate::config::DEV_JWT_SECRET {
            tracing::warn!("Using the built-in development JWT secret");
        }
        let tokens = TokenIssuer::new(&auth.jwt_secret, auth.access_token_lifetime);
        Self {
            repos,
            auth,
            tokens,
        }
    }
}

/// Log a repository failure and hide it behind `Internal`
fn storage(operation: &'static str) -> impl FnOnce(anyhow::Error) -> RequirementsError {
    move |e| {
        tracing::error!(operation, error = %e, "Storage operation failed");
        RequirementsError::Internal
    }
}

/// Like [`storage`], but a write rejected by a unique index becomes `Duplicate`
fn storage_or_duplicate(
    operation: &'static str,
    resource: &'static str,
    detail: String,
) -> impl FnOnce(anyhow::Error) -> RequirementsError {
    move |e| {
        if e.is::<UniqueViolation>() {
            tracing::info!(operation, resource, %detail, "Write lost a uniqueness race");
            RequirementsError::Duplicate {
                resource: resource.to_string(),
                detail,
            }
        } else {
            storage(operation)(e)
        }
    }
}

fn ensure_authenticated(user: &User) -> Result<(), RequirementsError> {
    PermissionChecker::authenticated().check(Some(user))
}

fn ensure_owner(user: &User, record: &dyn Owned) -> Result<(), RequirementsError> {
    PermissionChecker::owner().check_object(Some(user), record)
}
