//! Configuration for requirements service module

use serde::{Deserialize, Serialize};

/// Requirements service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Application name, used in logs and the OpenAPI title
    #[serde(default = "default_project_name")]
    pub project_name: String,

    /// Prefix all REST routes are mounted under
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,

    /// Message returned by the root endpoint
    #[serde(default = "default_welcome_message")]
    pub welcome_message: String,

    /// HMAC secret for signing access tokens
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,

    /// Access token lifetime (minutes)
    #[serde(default = "default_access_token_expire_minutes")]
    pub access_token_expire_minutes: i64,

    /// Failed logins tolerated inside the lockout window
    #[serde(default = "default_max_login_attempts")]
    pub max_login_attempts: u64,

    /// Lockout window (minutes)
    #[serde(default = "default_login_lockout_minutes")]
    pub login_lockout_minutes: i64,

    /// bcrypt cost factor
    #[serde(default = "default_password_hash_cost")]
    pub password_hash_cost: u32,
}

pub(crate) const DEV_JWT_SECRET: &str = "change-me-in-production";

impl Default for Config {
    fn default() -> Self {
        Self {
            project_name: default_project_name(),
            api_prefix: default_api_prefix(),
            welcome_message: default_welcome_message(),
            jwt_secret: default_jwt_secret(),
            access_token_expire_minutes: default_access_token_expire_minutes(),
            max_login_attempts: default_max_login_attempts(),
            login_lockout_minutes: default_login_lockout_minutes(),
            password_hash_cost: default_password_hash_cost(),
        }
    }
}

fn default_project_name() -> String {
    "ReqTrack".to_string()
}

fn default_api_prefix() -> String {
    "/api/v1".to_string()
}

fn default_welcome_message() -> String {
    "Welcome to ReqTrack".to_string()
}

fn default_jwt_secret() -> String {
    DEV_JWT_SECRET.to_string()
}

fn default_access_token_expire_minutes() -> i64 {
    30
}

fn default_max_login_attempts() -> u64 {
    5
}

fn default_login_lockout_minutes() -> i64 {
    15
}

fn default_password_hash_cost() -> u32 {
    bcrypt::DEFAULT_COST
}
