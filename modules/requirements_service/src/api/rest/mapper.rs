//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;

impl<T, U: From<T>> From<contract::Page<T>> for PageDto<U> {
    fn from(page: contract::Page<T>) -> Self {
        Self {
            items: page.items.into_iter().map(U::from).collect(),
            total: page.total,
            page: page.page,
            size: page.size,
        }
    }
}

// ===== User conversions =====

impl From<contract::User> for UserDto {
    fn from(user: contract::User) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
            created_at: user.created_at,
        }
    }
}

impl From<contract::AccessToken> for TokenResponse {
    fn from(token: contract::AccessToken) -> Self {
        Self {
            access_token: token.access_token,
            token_type: token.token_type,
        }
    }
}

// ===== Project conversions =====

impl From<contract::Project> for ProjectDto {
    fn from(p: contract::Project) -> Self {
        Self {
            id: p.id,
            founder_id: p.founder_id,
            title: p.title,
            description: p.description,
            is_deleted: p.is_deleted,
            deleted_at: p.deleted_at,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

impl From<CreateProjectRequest> for contract::NewProject {
    fn from(req: CreateProjectRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

impl From<UpdateProjectRequest> for contract::ProjectPatch {
    fn from(req: UpdateProjectRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
        }
    }
}

// ===== Document conversions =====

impl From<contract::Document> for DocumentDto {
    fn from(d: contract::Document) -> Self {
        Self {
            id: d.id,
            project_id: d.project_id,
            owner_id: d.owner_id,
            title: d.title,
            is_deleted: d.is_deleted,
            deleted_at: d.deleted_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<CreateDocumentRequest> for contract::NewDocument {
    fn from(req: CreateDocumentRequest) -> Self {
        Self {
            project_id: req.project_id,
            title: req.title,
        }
    }
}

impl From<UpdateDocumentRequest> for contract::DocumentPatch {
    fn from(req: UpdateDocumentRequest) -> Self {
        Self { title: req.title }
    }
}

// ===== Domain conversions =====

impl From<contract::Domain> for DomainDto {
    fn from(d: contract::Domain) -> Self {
        Self {
            id: d.id,
            document_id: d.document_id,
            owner_id: d.owner_id,
            name: d.name,
            description: d.description,
            is_deleted: d.is_deleted,
            deleted_at: d.deleted_at,
            created_at: d.created_at,
            updated_at: d.updated_at,
        }
    }
}

impl From<CreateDomainRequest> for contract::NewDomain {
    fn from(req: CreateDomainRequest) -> Self {
        Self {
            document_id: req.document_id,
            name: req.name,
            description: req.description,
        }
    }
}

impl From<UpdateDomainRequest> for contract::DomainPatch {
    fn from(req: UpdateDomainRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

// ===== Feature conversions =====

impl From<contract::Feature> for FeatureDto {
    fn from(f: contract::Feature) -> Self {
        Self {
            id: f.id,
            domain_id: f.domain_id,
            owner_id: f.owner_id,
            name: f.name,
            description: f.description,
            is_deleted: f.is_deleted,
            deleted_at: f.deleted_at,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

impl From<CreateFeatureRequest> for contract::NewFeature {
    fn from(req: CreateFeatureRequest) -> Self {
        Self {
            domain_id: req.domain_id,
            name: req.name,
            description: req.description,
        }
    }
}

impl From<UpdateFeatureRequest> for contract::FeaturePatch {
    fn from(req: UpdateFeatureRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
        }
    }
}

// ===== Requirement conversions =====

impl From<contract::Priority> for PriorityDto {
    fn from(p: contract::Priority) -> Self {
        match p {
            contract::Priority::Low => PriorityDto::Low,
            contract::Priority::Medium => PriorityDto::Medium,
            contract::Priority::High => PriorityDto::High,
            contract::Priority::Critical => PriorityDto::Critical,
        }
    }
}

impl From<PriorityDto> for contract::Priority {
    fn from(p: PriorityDto) -> Self {
        match p {
            PriorityDto::Low => contract::Priority::Low,
            PriorityDto::Medium => contract::Priority::Medium,
            PriorityDto::High => contract::Priority::High,
            PriorityDto::Critical => contract::Priority::Critical,
        }
    }
}

impl From<contract::Requirement> for RequirementDto {
    fn from(r: contract::Requirement) -> Self {
        Self {
            id: r.id,
            feature_id: r.feature_id,
            owner_id: r.owner_id,
            title: r.title,
            description: r.description,
            priority: r.priority.into(),
            is_deleted: r.is_deleted,
            deleted_at: r.deleted_at,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

impl From<CreateRequirementRequest> for contract::NewRequirement {
    fn from(req: CreateRequirementRequest) -> Self {
        Self {
            feature_id: req.feature_id,
            title: req.title,
            description: req.description,
            priority: req.priority.into(),
        }
    }
}

impl From<UpdateRequirementRequest> for contract::RequirementPatch {
    fn from(req: UpdateRequirementRequest) -> Self {
        Self {
            title: req.title,
            description: req.description,
            priority: req.priority.map(Into::into),
            feature_id: req.feature_id,
        }
    }
}
