//! Contract models for requirements service
//!
//! These models are transport-agnostic and shared by the domain, storage and REST layers.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};

/// Registered user account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i32,
    /// Always stored lowercase
    pub email: String,
    pub name: String,
    pub hashed_password: String,
    pub is_deleted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Registration input after validation and normalization
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub hashed_password: String,
}

/// Bearer token issued on successful login
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessToken {
    pub access_token: String,
    pub token_type: String,
}

/// Project, the root of the requirement hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i32,
    /// Owner of the project
    pub founder_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewProject {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

/// Document belonging to a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: i32,
    pub project_id: i32,
    pub owner_id: i32,
    pub title: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDocument {
    pub project_id: i32,
    pub title: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    pub title: Option<String>,
}

/// Functional domain described by a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    pub id: i32,
    pub document_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewDomain {
    pub document_id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainPatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Feature within a domain
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feature {
    pub id: i32,
    pub domain_id: i32,
    pub owner_id: i32,
    pub name: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewFeature {
    pub domain_id: i32,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeaturePatch {
    pub name: Option<String>,
    pub description: Option<String>,
}

/// Requirement priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    /// Wire and storage representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Low => "LOW",
            Priority::Medium => "MEDIUM",
            Priority::High => "HIGH",
            Priority::Critical => "CRITICAL",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_ascii_uppercase().as_str() {
            "LOW" => Some(Priority::Low),
            "MEDIUM" => Some(Priority::Medium),
            "HIGH" => Some(Priority::High),
            "CRITICAL" => Some(Priority::Critical),
            _ => None,
        }
    }
}

/// Requirement attached to a feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub id: i32,
    pub feature_id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRequirement {
    pub feature_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: Priority,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequirementPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// Moves the requirement to another feature
    pub feature_id: Option<i32>,
}

/// Records that can be mutated only by the user who created them
pub trait Owned {
    fn owner_id(&self) -> i32;
}

impl Owned for Project {
    fn owner_id(&self) -> i32 {
        self.founder_id
    }
}

impl Owned for Document {
    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

impl Owned for Domain {
    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

impl Owned for Feature {
    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

impl Owned for Requirement {
    fn owner_id(&self) -> i32 {
        self.owner_id
    }
}

/// Filter applied to list operations
///
/// `parent_id` is interpreted per resource: `founder_id` for projects,
/// `project_id` for documents, `document_id` for domains and so on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub parent_id: Option<i32>,
    pub owner_id: Option<i32>,
}

/// Requested page, 1-based
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub size: u64,
}

impl PageRequest {
    pub const DEFAULT_SIZE: u64 = 20;
    pub const MAX_SIZE: u64 = 100;

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            size: Self::DEFAULT_SIZE,
        }
    }
}

/// One page of results together with the total number of matching rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

impl<T> Page<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            size: self.size,
        }
    }
}
