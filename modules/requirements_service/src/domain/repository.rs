//! Repository traits for data access
//!
//! These traits define the interface for data access operations.
//! Implementations are in infra/storage/repositories.rs
//!
//! Lookups by id skip soft-deleted rows unless the method says otherwise.

use crate::contract::{
    Document, DocumentPatch, Domain, DomainPatch, Feature, FeaturePatch, ListFilter,
    NewDocument, NewDomain, NewFeature, NewProject, NewRequirement, NewUser, PageRequest,
    Project, ProjectPatch, Requirement, RequirementPatch, User,
};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// A write collided with a unique index
///
/// Repositories return it inside `anyhow::Error`; check with `err.is::<UniqueViolation>()`.
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated")]
pub struct UniqueViolation;

/// Repository for user accounts
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &NewUser) -> Result<User>;

    async fn find_by_id(&self, id: i32) -> Result<Option<User>>;

    /// Case-insensitive lookup, deleted accounts excluded
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
}

/// Repository for failed login attempts
#[async_trait]
pub trait LoginAttemptRepository: Send + Sync {
    async fn record(&self, email: &str, at: DateTime<Utc>) -> Result<()>;

    /// Attempts for `email` at or after `since`, oldest first
    async fn list_since(&self, email: &str, since: DateTime<Utc>) -> Result<Vec<DateTime<Utc>>>;

    async fn clear(&self, email: &str) -> Result<()>;
}

/// Repository for projects
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    async fn create(&self, founder_id: i32, project: &NewProject) -> Result<Project>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Project>>;

    /// Includes soft-deleted rows
    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Project>>;

    /// Includes soft-deleted rows, which keep their title reserved
    async fn find_by_title_and_founder(&self, title: &str, founder_id: i32)
        -> Result<Option<Project>>;

    /// `filter.parent_id` selects the founder
    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Project>, u64)>;

    async fn update(&self, id: i32, patch: &ProjectPatch) -> Result<Option<Project>>;

    async fn soft_delete(&self, id: i32) -> Result<bool>;

    async fn restore(&self, id: i32) -> Result<Option<Project>>;
}

/// Repository for documents
#[async_trait]
pub trait DocumentRepository: Send + Sync {
    async fn create(&self, owner_id: i32, document: &NewDocument) -> Result<Document>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Document>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Document>>;

    /// Includes soft-deleted rows, which keep their title reserved
    async fn find_by_title_and_project(&self, title: &str, project_id: i32)
        -> Result<Option<Document>>;

    /// `filter.parent_id` selects the project
    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Document>, u64)>;

    async fn update(&self, id: i32, patch: &DocumentPatch) -> Result<Option<Document>>;

    async fn soft_delete(&self, id: i32) -> Result<bool>;

    async fn restore(&self, id: i32) -> Result<Option<Document>>;
}

/// Repository for domains
#[async_trait]
pub trait DomainRepository: Send + Sync {
    async fn create(&self, owner_id: i32, domain: &NewDomain) -> Result<Domain>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Domain>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Domain>>;

    /// `filter.parent_id` selects the document
    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Domain>, u64)>;

    async fn update(&self, id: i32, patch: &DomainPatch) -> Result<Option<Domain>>;

    async fn soft_delete(&self, id: i32) -> Result<bool>;

    async fn restore(&self, id: i32) -> Result<Option<Domain>>;
}

/// Repository for features
#[async_trait]
pub trait FeatureRepository: Send + Sync {
    async fn create(&self, owner_id: i32, feature: &NewFeature) -> Result<Feature>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Feature>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Feature>>;

    /// `filter.parent_id` selects the domain
    async fn list(&self, filter: ListFilter, page: PageRequest) -> Result<(Vec<Feature>, u64)>;

    async fn update(&self, id: i32, patch: &FeaturePatch) -> Result<Option<Feature>>;

    async fn soft_delete(&self, id: i32) -> Result<bool>;

    async fn restore(&self, id: i32) -> Result<Option<Feature>>;
}

/// Repository for requirements
#[async_trait]
pub trait RequirementRepository: Send + Sync {
    async fn create(&self, owner_id: i32, requirement: &NewRequirement) -> Result<Requirement>;

    async fn find_by_id(&self, id: i32) -> Result<Option<Requirement>>;

    async fn find_by_id_with_deleted(&self, id: i32) -> Result<Option<Requirement>>;

    /// `filter.parent_id` selects the feature
    async fn list(&self, filter: ListFilter, page: PageRequest)
        -> Result<(Vec<Requirement>, u64)>;

    async fn update(&self, id: i32, patch: &RequirementPatch) -> Result<Option<Requirement>>;

    async fn soft_delete(&self, id: i32) -> Result<bool>;

    async fn restore(&self, id: i32) -> Result<Option<Requirement>>;
}
