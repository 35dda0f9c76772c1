use chrono::Utc;
use jsonwebtoken::decode;
use jsonwebtoken::encode;
use jsonwebtoken::errors::ErrorKind as JwtErrorKind;
use jsonwebtoken::Algorithm;
use jsonwebtoken::DecodingKey;
use jsonwebtoken::EncodingKey;
use jsonwebtoken::Header;
use jsonwebtoken::Validation;

use super::claims::AccessClaims;
use super::claims::IdentityClaim;
use crate::error::Cause;
use crate::error::Error;
use crate::error::ErrorKind;

/// Access token codec.
///
/// Signs with HS256 using a symmetric key shared by issuance and
/// verification.
#[derive(Clone)]
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtHandler {
    /// Create a new JWT handler with a secret key.
    ///
    /// # Arguments
    /// * `secret` - Secret key for signing tokens (should be stored securely)
    ///
    /// # Security Notes
    /// - The secret should be at least 256 bits (32 bytes) for HS256
    /// - Store secrets in environment variables or secure vaults, never in code
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_nbf = true;
        // Issuer and audience are written but not checked on the way in.
        validation.validate_aud = false;
        // `nbf` is checked only when present.
        validation.set_required_spec_claims(&["exp"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Issue a token for `identity`, valid from now for 24 hours.
    ///
    /// # Errors
    /// * `Internal` - Token encoding failed
    pub fn issue(&self, identity: IdentityClaim) -> Result<String, Error> {
        self.sign(&AccessClaims::for_identity(identity, Utc::now()))
    }

    /// Sign an explicit claim set.
    ///
    /// # Errors
    /// * `Internal` - Token encoding failed
    pub fn sign(&self, claims: &AccessClaims) -> Result<String, Error> {
        let header = Header::new(Algorithm::HS256);

        encode(&header, claims, &self.encoding_key).map_err(|e| {
            Error::with_cause(ErrorKind::Internal, "failed to sign token", Cause::error(e))
        })
    }

    /// Decode and validate a token.
    ///
    /// # Errors
    /// * `Unauthorized` - Bad signature, malformed token, expired or not yet valid
    pub fn decode(&self, token: &str) -> Result<AccessClaims, Error> {
        let token_data =
            decode::<AccessClaims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                let message = match e.kind() {
                    JwtErrorKind::ExpiredSignature => "token has expired",
                    JwtErrorKind::ImmatureSignature => "token is not valid yet",
                    JwtErrorKind::InvalidSignature => "token signature is invalid",
                    _ => "token is invalid",
                };
                Error::with_cause(ErrorKind::Unauthorized, message, Cause::error(e))
            })?;

        Ok(token_data.claims)
    }

    /// Validate a token and return the identity it carries.
    ///
    /// # Errors
    /// * `Unauthorized` - See [`JwtHandler::decode`]
    pub fn verify(&self, token: &str) -> Result<IdentityClaim, Error> {
        self.decode(token).map(|claims| claims.data)
    }
}
