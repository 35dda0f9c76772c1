pub mod claims;
pub mod handler;

pub use claims::AccessClaims;
pub use claims::IdentityClaim;
pub use claims::SERVICE_NAME;
pub use claims::TOKEN_LIFETIME_HOURS;
pub use handler::JwtHandler;
