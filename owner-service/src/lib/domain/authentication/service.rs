use std::sync::Arc;

use async_trait::async_trait;
use auth::Error;
use auth::ErrorKind;
use auth::PasswordHasher;

use crate::domain::authentication::ports::AuthenticationServicePort;
use crate::domain::authentication::ports::CredentialLookup;
use crate::domain::owner::models::Owner;

/// Message of the single error returned for any rejected credential pair.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "username or email or password is invalid";

/// Domain service implementation for credential verification.
///
/// Unknown identifiers and wrong passwords collapse into one
/// `InvalidParameter` error; every other failure propagates as is.
pub struct AuthenticationService<CL>
where
    CL: CredentialLookup,
{
    lookup: Arc<CL>,
    password_hasher: PasswordHasher,
}

impl<CL> AuthenticationService<CL>
where
    CL: CredentialLookup,
{
    /// Create a new authentication service.
    ///
    /// # Arguments
    /// * `lookup` - Credential store implementation
    pub fn new(lookup: Arc<CL>) -> Self {
        Self::with_password_hasher(lookup, PasswordHasher::new())
    }

    pub fn with_password_hasher(lookup: Arc<CL>, password_hasher: PasswordHasher) -> Self {
        Self {
            lookup,
            password_hasher,
        }
    }
}

fn invalid_credentials(err: Error) -> Error {
    err.translate(ErrorKind::InvalidParameter, INVALID_CREDENTIALS_MESSAGE)
}

#[async_trait]
impl<CL> AuthenticationServicePort for AuthenticationService<CL>
where
    CL: CredentialLookup,
{
    async fn authenticate(&self, identifier: &str, password: &str) -> Result<Owner, Error> {
        let account = self
            .lookup
            .get_by_identifier(identifier)
            .await
            .map_err(|e| match e.kind() {
                Some(ErrorKind::NotFound) => {
                    tracing::debug!("No owner account for identifier");
                    invalid_credentials(e)
                }
                _ => e,
            })?;

        self.password_hasher
            .verify(&account.password_hash, password)
            .map_err(|e| match e.kind() {
                Some(ErrorKind::NotMatch) => {
                    tracing::debug!(owner_id = account.owner.id, "Password does not match");
                    invalid_credentials(e)
                }
                _ => e,
            })?;

        Ok(account.into_owner())
    }
}
