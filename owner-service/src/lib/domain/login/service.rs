use std::sync::Arc;

use async_trait::async_trait;
use auth::Error;
use auth::ErrorKind;
use auth::IdentityClaim;

use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::login::ports::LoginServicePort;
use crate::domain::login::ports::TokenIssuer;

/// Login service composing authentication and token issuance.
pub struct LoginService<AS, TI>
where
    AS: AuthenticationServicePort,
    TI: TokenIssuer,
{
    authentication: Arc<AS>,
    token_issuer: Arc<TI>,
}

impl<AS, TI> LoginService<AS, TI>
where
    AS: AuthenticationServicePort,
    TI: TokenIssuer,
{
    /// Create a new login service.
    ///
    /// # Arguments
    /// * `authentication` - Credential verification
    /// * `token_issuer` - Access token signer
    pub fn new(authentication: Arc<AS>, token_issuer: Arc<TI>) -> Self {
        Self {
            authentication,
            token_issuer,
        }
    }
}

#[async_trait]
impl<AS, TI> LoginServicePort for LoginService<AS, TI>
where
    AS: AuthenticationServicePort,
    TI: TokenIssuer,
{
    async fn login(&self, identifier: &str, password: &str) -> Result<String, Error> {
        let owner = self.authentication.authenticate(identifier, password).await?;

        let identity = IdentityClaim::new(owner.id, owner.username);
        let access_token = self.token_issuer.issue(identity).map_err(|e| {
            tracing::error!(
                owner_id = owner.id,
                error = %e,
                error_stack = %e.error_stack(),
                "Failed to issue access token"
            );
            Error::new(ErrorKind::Internal, ErrorKind::Internal.as_str())
        })?;

        tracing::info!(owner_id = owner.id, "Access token issued");

        Ok(access_token)
    }
}
