//! Contract layer - transport-agnostic models and errors
//!
//! NO serde derives on models - these are pure domain types.

pub mod error;
pub mod model;

pub use error::RequirementsError;
pub use model::{
    AccessToken, Document, DocumentPatch, Domain, DomainPatch, Feature, FeaturePatch,
    ListFilter, NewDocument, NewDomain, NewFeature, NewProject, NewRequirement, NewUser,
    Owned, Page, PageRequest, Priority, Project, ProjectPatch, Requirement, RequirementPatch,
    User,
};
