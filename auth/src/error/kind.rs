use std::fmt;
use std::str::FromStr;

use super::Error;

/// Closed set of failure categories.
///
/// The kind drives both the HTTP status hint carried by an [`Error`] and the
/// propagation policy of the services that inspect it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidParameter,
    Unauthorized,
    Forbidden,
    NotFound,
    Internal,
    NotImplemented,
    BadGateway,
    ServiceUnavailable,
    /// Failed secret comparison. Never surfaced past the authentication
    /// boundary, where it is translated to `InvalidParameter`.
    NotMatch,
}

/// Kind name that does not belong to the closed set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error kind: {0}")]
pub struct UnknownKind(pub String);

impl ErrorKind {
    pub const ALL: [ErrorKind; 9] = [
        ErrorKind::InvalidParameter,
        ErrorKind::Unauthorized,
        ErrorKind::Forbidden,
        ErrorKind::NotFound,
        ErrorKind::Internal,
        ErrorKind::NotImplemented,
        ErrorKind::BadGateway,
        ErrorKind::ServiceUnavailable,
        ErrorKind::NotMatch,
    ];

    /// HTTP status code hint for this kind.
    pub const fn status_code(self) -> u16 {
        match self {
            ErrorKind::InvalidParameter => 400,
            ErrorKind::Unauthorized => 401,
            ErrorKind::Forbidden => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Internal => 500,
            ErrorKind::NotImplemented => 501,
            ErrorKind::BadGateway => 502,
            ErrorKind::ServiceUnavailable => 503,
            ErrorKind::NotMatch => 400,
        }
    }

    /// Stable wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::InvalidParameter => "BAD_REQUEST",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
            ErrorKind::Forbidden => "FORBIDDEN",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Internal => "INTERNAL_ERROR",
            ErrorKind::NotImplemented => "NOT_IMPLEMENTED",
            ErrorKind::BadGateway => "BAD_GATEWAY",
            ErrorKind::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            ErrorKind::NotMatch => "NOT_MATCH",
        }
    }

    /// Status code for a kind name received as text.
    ///
    /// Names outside the closed set map to the internal status code.
    pub fn status_code_for(name: &str) -> u16 {
        name.parse::<ErrorKind>()
            .unwrap_or(ErrorKind::Internal)
            .status_code()
    }

    /// Bare comparison template for this kind.
    ///
    /// Message and cause are both the kind name and no stack is captured.
    /// Use it as the right-hand side of [`Error::is`] or [`super::is`].
    pub fn template(self) -> Error {
        Error::template(self)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorKind {
    type Err = UnknownKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| UnknownKind(s.to_string()))
    }
}
