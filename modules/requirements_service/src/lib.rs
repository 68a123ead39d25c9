//! Requirements Service Module
//!
//! Users, authentication and the requirement hierarchy
//! (project → document → domain → feature → requirement) exposed over REST.

// Public exports
pub mod contract;
pub use contract::{
    error::RequirementsError, Document, Domain, Feature, Page, PageRequest, Priority, Project,
    Requirement, User,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::{connect, RequirementsServiceModule};

pub mod api;
pub mod domain;
pub mod infra;
