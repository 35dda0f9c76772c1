use async_trait::async_trait;
use auth::Error;

use crate::domain::owner::models::Owner;
use crate::domain::owner::models::OwnerAccount;

/// Port for credential verification.
#[async_trait]
pub trait AuthenticationServicePort: Send + Sync + 'static {
    /// Verify an identifier and password pair.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address
    /// * `password` - Plaintext password
    ///
    /// # Returns
    /// Identity of the matching owner
    ///
    /// # Errors
    /// * `InvalidParameter` - Unknown identifier or wrong password (indistinguishable)
    /// * Any other kind - Lookup or hashing failure, propagated unchanged
    async fn authenticate(&self, identifier: &str, password: &str) -> Result<Owner, Error>;
}

/// Read access to stored owner credentials.
#[async_trait]
pub trait CredentialLookup: Send + Sync + 'static {
    /// Retrieve an account whose username or email equals `identifier`.
    ///
    /// # Arguments
    /// * `identifier` - Username or email address
    ///
    /// # Returns
    /// Owner account with its password hash
    ///
    /// # Errors
    /// * `NotFound` - No account matches
    /// * `Internal` - Store operation failed
    async fn get_by_identifier(&self, identifier: &str) -> Result<OwnerAccount, Error>;
}
