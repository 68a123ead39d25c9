//! Repository automation
//!
//! - [`branch`]: derive `{req|fix}/{issue}-{slug}` branch names from issue labels and titles
//! - [`report`]: run a test command and render its outcome as a pull request comment
//! - [`github`]: minimal GitHub REST client for posting comments

pub mod branch;
pub mod error;
pub mod event;
pub mod git;
pub mod github;
pub mod report;

pub use error::BotError;
