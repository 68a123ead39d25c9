//! Entity to model mappers
//!
//! Conversions between SeaORM entities and contract models

use super::entity::{document, domain, feature, project, requirement, user};
use crate::contract::{Document, Domain, Feature, Priority, Project, Requirement, User};

impl From<user::Model> for User {
    fn from(entity: user::Model) -> Self {
        Self {
            id: entity.id,
            email: entity.email,
            name: entity.name,
            hashed_password: entity.hashed_password,
            is_deleted: entity.is_deleted,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<project::Model> for Project {
    fn from(entity: project::Model) -> Self {
        Self {
            id: entity.id,
            founder_id: entity.founder_id,
            title: entity.title,
            description: entity.description,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<document::Model> for Document {
    fn from(entity: document::Model) -> Self {
        Self {
            id: entity.id,
            project_id: entity.project_id,
            owner_id: entity.owner_id,
            title: entity.title,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<domain::Model> for Domain {
    fn from(entity: domain::Model) -> Self {
        Self {
            id: entity.id,
            document_id: entity.document_id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<feature::Model> for Feature {
    fn from(entity: feature::Model) -> Self {
        Self {
            id: entity.id,
            domain_id: entity.domain_id,
            owner_id: entity.owner_id,
            name: entity.name,
            description: entity.description,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

// ===== Requirement Conversions =====

impl TryFrom<requirement::Model> for Requirement {
    type Error = anyhow::Error;

    fn try_from(entity: requirement::Model) -> Result<Self, Self::Error> {
        let priority = Priority::parse(&entity.priority).ok_or_else(|| {
            anyhow::anyhow!(
                "requirement {} has unknown priority '{}'",
                entity.id,
                entity.priority
            )
        })?;

        Ok(Self {
            id: entity.id,
            feature_id: entity.feature_id,
            owner_id: entity.owner_id,
            title: entity.title,
            description: entity.description,
            priority,
            is_deleted: entity.is_deleted,
            deleted_at: entity.deleted_at,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        })
    }
}
