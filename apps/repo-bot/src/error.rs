//! Error types for repository automation

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// GitHub answered with a non-success status
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid event payload: {0}")]
    Event(#[from] serde_json::Error),

    #[error("`git {args}` failed with {status}: {stderr}")]
    Git {
        args: String,
        status: String,
        stderr: String,
    },

    #[error("failed to spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("environment variable {0} is not set")]
    MissingEnv(&'static str),

    #[error("repository must look like `owner/name`, got `{0}`")]
    InvalidRepository(String),
}
