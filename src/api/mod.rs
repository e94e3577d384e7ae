//! API handlers for the barbershop REST endpoints

pub mod admin;
pub mod availability;
pub mod barbers;
pub mod citas;
pub mod health;
pub mod notifications;
pub mod offerings;
pub mod openapi;

use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{error::AppError, models::Identity, services::identity::IdentityProvider};

/// Extractor for the caller verified by the identity provider
pub struct AuthenticatedUser(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    Arc<dyn IdentityProvider>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let provider = <Arc<dyn IdentityProvider> as FromRef<S>>::from_ref(state);
        let identity = provider.verify_token(token).await?;
        Ok(AuthenticatedUser(identity))
    }
}
