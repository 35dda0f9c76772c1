use async_trait::async_trait;
use auth::Error;
use auth::IdentityClaim;

/// Port for the login operation.
#[async_trait]
pub trait LoginServicePort: Send + Sync + 'static {
    /// Authenticate and issue an access token.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Signed access token
    ///
    /// # Errors
    /// * `InvalidParameter` - Credentials rejected
    /// * `Internal` - Token issuance failed
    /// * Any other kind - Propagated from authentication
    async fn login(&self, identifier: &str, password: &str) -> Result<String, Error>;
}

/// Port for signing access tokens.
pub trait TokenIssuer: Send + Sync + 'static {
    /// Issue a signed token carrying `identity`.
    fn issue(&self, identity: IdentityClaim) -> Result<String, Error>;
}
