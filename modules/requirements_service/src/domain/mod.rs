//! Domain layer - business logic and services

pub mod permissions;
pub mod repository;
pub mod security;
pub mod service;
pub mod validation;

pub use repository::{
    DocumentRepository, DomainRepository, FeatureRepository, LoginAttemptRepository,
    ProjectRepository, RequirementRepository, UniqueViolation, UserRepository,
};
pub use service::{AuthSettings, Repositories, Service};
