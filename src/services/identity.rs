//! Identity provider: token verification and the role directory

use std::sync::Arc;

use async_trait::async_trait;
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use mockall::automock;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        user::TokenClaims,
        DirectoryUser, Identity, Role,
    },
    repository::users::UserDirectory,
};

#[automock]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Verify a bearer token and resolve the caller's effective role
    async fn verify_token(&self, token: &str) -> AppResult<Identity>;

    /// Set the custom role claim of a user
    async fn set_role(&self, uid: &str, role: Role) -> AppResult<DirectoryUser>;

    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>>;
}

/// HS256 tokens issued by the external provider, plus a local role directory
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
    directory: Arc<dyn UserDirectory>,
}

impl JwtIdentityProvider {
    pub fn new(config: &AuthConfig, directory: Arc<dyn UserDirectory>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_required_spec_claims(&["exp", "sub"]);
        if let Some(ref issuer) = config.issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            directory,
        }
    }

    fn decode_claims(&self, token: &str) -> AppResult<TokenClaims> {
        decode::<TokenClaims>(token, &self.key, &self.validation)
            .map(|data| data.claims)
            .map_err(|e| AppError::Authentication(format!("Invalid token: {}", e)))
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    async fn verify_token(&self, token: &str) -> AppResult<Identity> {
        let claims = self.decode_claims(token)?;
        if claims.email.trim().is_empty() {
            return Err(AppError::Authentication("Token carries no email".to_string()));
        }

        // A role set through the directory wins over the one in the token
        let role = match self.directory.touch(&claims.sub, &claims.email).await {
            Ok(user) => user.role.or(claims.role),
            Err(e) => {
                tracing::warn!(uid = %claims.sub, "User directory unavailable, using token role: {}", e);
                claims.role
            }
        };

        Ok(Identity {
            uid: claims.sub,
            email: claims.email,
            role,
        })
    }

    async fn set_role(&self, uid: &str, role: Role) -> AppResult<DirectoryUser> {
        self.directory.set_role(uid, role).await
    }

    async fn list_users(&self) -> AppResult<Vec<DirectoryUser>> {
        self.directory.list().await
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};

    use super::*;
    use crate::repository::users::MockUserDirectory;

    const SECRET: &str = "test-secret";

    fn config() -> AuthConfig {
        AuthConfig {
            jwt_secret: SECRET.to_string(),
            issuer: None,
        }
    }

    fn token(role: Option<Role>, secret: &str) -> String {
        let claims = TokenClaims {
            sub: "uid-1".to_string(),
            email: "ana@example.com".to_string(),
            role,
            exp: Utc::now().timestamp() + 3600,
            iat: Some(Utc::now().timestamp()),
            iss: None,
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn directory_with(role: Option<Role>) -> MockUserDirectory {
        let mut directory = MockUserDirectory::new();
        directory.expect_touch().returning(move |uid, email| {
            Ok(DirectoryUser {
                uid: uid.to_string(),
                email: email.to_string(),
                role,
                updated_at: Utc::now(),
            })
        });
        directory
    }

    #[tokio::test]
    async fn test_directory_role_overrides_token() {
        let provider = JwtIdentityProvider::new(&config(), Arc::new(directory_with(Some(Role::Admin))));
        let identity = provider.verify_token(&token(Some(Role::Client), SECRET)).await.unwrap();
        assert_eq!(identity.uid, "uid-1");
        assert_eq!(identity.email, "ana@example.com");
        assert!(identity.is_admin());
    }

    #[tokio::test]
    async fn test_token_role_used_without_directory_role() {
        let provider = JwtIdentityProvider::new(&config(), Arc::new(directory_with(None)));
        let identity = provider.verify_token(&token(Some(Role::Client), SECRET)).await.unwrap();
        assert_eq!(identity.role, Some(Role::Client));
    }

    #[tokio::test]
    async fn test_bad_signature_is_rejected() {
        let mut directory = MockUserDirectory::new();
        directory.expect_touch().times(0);
        let provider = JwtIdentityProvider::new(&config(), Arc::new(directory));

        let result = provider.verify_token(&token(None, "other-secret")).await;
        assert!(matches!(result, Err(AppError::Authentication(_))));
        assert!(matches!(
            provider.verify_token("not-a-token").await,
            Err(AppError::Authentication(_))
        ));
    }
}
