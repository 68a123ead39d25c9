//! Bearer token extraction

use super::error::{map_domain_error, Problem};
use crate::contract::{RequirementsError, User};
use crate::domain::Service;
use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts, StatusCode},
};
use std::sync::Arc;

/// The authenticated caller resolved from `Authorization: Bearer <token>`
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let service = parts
            .extensions
            .get::<Arc<Service>>()
            .cloned()
            .ok_or_else(|| {
                tracing::error!("Service extension missing from router");
                Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
            })?;

        let token = bearer_token(parts).ok_or_else(|| map_domain_error(RequirementsError::InvalidToken))?;
        let user = service.current_user(token).await.map_err(map_domain_error)?;
        Ok(CurrentUser(user))
    }
}

fn bearer_token(parts: &Parts) -> Option<&str> {
    let value = parts.headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}
