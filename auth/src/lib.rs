//! Authentication primitives for the owner services.
//!
//! Provides the leaves of the login pipeline:
//! - A typed, stack-capturing error shared by every stage
//! - Password hashing (bcrypt)
//! - Access token issuance and verification (HS256 JWT)
//!
//! Services define their own ports and compose these implementations.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::with_cost(4);
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password").is_ok());
//! ```
//!
//! ## Access Tokens
//! ```
//! use auth::{IdentityClaim, JwtHandler};
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!");
//! let token = handler.issue(IdentityClaim::new(1, "devoratio")).unwrap();
//! let identity = handler.verify(&token).unwrap();
//! assert_eq!(identity.username, "devoratio");
//! ```
//!
//! ## Errors
//! ```
//! use auth::{Error, ErrorKind};
//!
//! let not_found = Error::new(ErrorKind::NotFound, "owner not found");
//! let err = not_found.translate(ErrorKind::InvalidParameter, "invalid input");
//! assert_eq!(err.status_code(), Some(400));
//! assert_eq!(err.to_string(), "error 400: invalid input: error 404: owner not found");
//! ```

pub mod error;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use error::Cause;
pub use error::Error;
pub use error::ErrorKind;
pub use jwt::AccessClaims;
pub use jwt::IdentityClaim;
pub use jwt::JwtHandler;
pub use password::PasswordHasher;
