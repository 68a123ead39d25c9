use super::{storage, storage_or_duplicate, Service};
use crate::contract::{AccessToken, NewUser, RequirementsError, User};
use crate::domain::security::{hash_password, verify_password};
use crate::domain::validation::{validate_login, validate_registration};
use chrono::Utc;

impl Service {
    // ===== Account Operations =====

    /// Register a new account
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<User, RequirementsError> {
        let reg = validate_registration(email, password, name)?;

        let existing = self
            .repos
            .users
            .find_by_email(&reg.email)
            .await
            .map_err(storage("find user by email"))?;
        let duplicate_detail = format!("email '{}' is already registered", reg.email);
        if existing.is_some() {
            return Err(RequirementsError::Duplicate {
                resource: "User".to_string(),
                detail: duplicate_detail,
            });
        }

        let hashed_password = hash_password(&reg.password, self.auth.password_hash_cost).await?;
        let user = self
            .repos
            .users
            .create(&NewUser {
                email: reg.email,
                name: reg.name,
                hashed_password,
            })
            .await
            .map_err(storage_or_duplicate("create user", "User", duplicate_detail))?;

        tracing::info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Check credentials, enforcing the failed-login lockout
    pub async fn authenticate(&self, email: &str, password: &str) -> Result<User, RequirementsError> {
        let (email, password) = validate_login(email, password)?;
        let now = Utc::now();

        let attempts = self
            .repos
            .login_attempts
            .list_since(&email, now - self.auth.lockout_window)
            .await
            .map_err(storage("list login attempts"))?;
        if attempts.len() as u64 >= self.auth.max_login_attempts {
            let oldest = attempts.iter().min().copied().unwrap_or(now);
            let retry_after_secs = (oldest + self.auth.lockout_window - now)
                .num_seconds()
                .max(1) as u64;
            tracing::warn!(%email, attempts = attempts.len(), "Login locked out");
            return Err(RequirementsError::TooManyAttempts { retry_after_secs });
        }

        let user = self
            .repos
            .users
            .find_by_email(&email)
            .await
            .map_err(storage("find user by email"))?;

        let verified = match &user {
            Some(u) => verify_password(&password, &u.hashed_password).await?,
            None => false,
        };

        match user {
            Some(user) if verified => {
                self.repos
                    .login_attempts
                    .clear(&email)
                    .await
                    .map_err(storage("clear login attempts"))?;
                Ok(user)
            }
            _ => {
                self.repos
                    .login_attempts
                    .record(&email, now)
                    .await
                    .map_err(storage("record login attempt"))?;
                tracing::info!(%email, "Failed login attempt");
                Err(RequirementsError::InvalidCredentials)
            }
        }
    }

    /// Authenticate and issue a bearer token
    pub async fn login(&self, email: &str, password: &str) -> Result<AccessToken, RequirementsError> {
        let user = self.authenticate(email, password).await?;
        let access_token = self.tokens.issue(&user.email, Utc::now())?;
        Ok(AccessToken {
            access_token,
            token_type: "bearer".to_string(),
        })
    }

    /// Resolve the caller behind a bearer token
    pub async fn current_user(&self, token: &str) -> Result<User, RequirementsError> {
        let email = self.tokens.verify(token)?;
        let user = self
            .repos
            .users
            .find_by_email(&email)
            .await
            .map_err(storage("find user by email"))?
            .ok_or(RequirementsError::InvalidToken)?;
        if user.is_deleted {
            return Err(RequirementsError::InvalidToken);
        }
        Ok(user)
    }
}
