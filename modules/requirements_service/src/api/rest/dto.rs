//! REST DTOs with serde derives for HTTP API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Root endpoint payload
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RootResponse {
    #[schema(example = "Welcome to ReqTrack")]
    pub message: String,
}

// ===== User DTOs =====

/// Registration request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegisterRequest {
    #[schema(example = "jane@example.com")]
    pub email: String,

    /// 8-20 characters with a lowercase letter, a digit and a special character
    #[schema(example = "ValidPass1!")]
    pub password: String,

    #[schema(example = "Jane Doe")]
    pub name: String,
}

/// Public view of a user; never carries the password hash
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserDto {
    pub id: i32,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// OAuth2 password-flow form
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginForm {
    /// Account email
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
}

// ===== Listing =====

/// Pagination and parent filters accepted by list endpoints
///
/// Each resource reads only the parent filter that applies to it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<u64>,
    pub size: Option<u64>,
    pub owner_id: Option<i32>,
    pub founder_id: Option<i32>,
    pub project_id: Option<i32>,
    pub document_id: Option<i32>,
    pub domain_id: Option<i32>,
    pub feature_id: Option<i32>,
}

/// One page of results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageDto<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub size: u64,
}

// ===== Project DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProjectDto {
    pub id: i32,
    pub founder_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateProjectRequest {
    #[schema(example = "Payments Platform")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateProjectRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ===== Document DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DocumentDto {
    pub id: i32,
    pub project_id: i32,
    pub owner_id: i32,
    pub title: String,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDocumentRequest {
    pub project_id: i32,
    pub title: String,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDocumentRequest {
    #[serde(default)]
    pub title: Option<String>,
}

// ===== Domain DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DomainDto {
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

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateDomainRequest {
    pub document_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateDomainRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ===== Feature DTOs =====

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeatureDto {
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

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateFeatureRequest {
    pub domain_id: i32,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateFeatureRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

// ===== Requirement DTOs =====

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum PriorityDto {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RequirementDto {
    pub id: i32,
    pub feature_id: i32,
    pub owner_id: i32,
    pub title: String,
    pub description: Option<String>,
    pub priority: PriorityDto,
    pub is_deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateRequirementRequest {
    pub feature_id: i32,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Defaults to MEDIUM
    #[serde(default)]
    pub priority: PriorityDto,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct UpdateRequirementRequest {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<PriorityDto>,
    /// Move the requirement to another feature
    #[serde(default)]
    pub feature_id: Option<i32>,
}
