use crate::error::Cause;
use crate::error::Error;
use crate::error::ErrorKind;

/// bcrypt cost used unless configured otherwise.
pub const DEFAULT_COST: u32 = 12;

/// bcrypt only reads the first 72 bytes of its input.
pub const MAX_PASSWORD_BYTES: usize = 72;

/// Password hashing implementation.
///
/// Stored hashes are bcrypt modular crypt strings. Any other format is
/// treated as a malformed hash.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

/// Hash formats recognised by [`PasswordHasher::verify`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HashScheme {
    Bcrypt,
    Unknown,
}

impl HashScheme {
    fn detect(hashed: &str) -> Self {
        const BCRYPT_PREFIXES: [&str; 4] = ["$2a$", "$2b$", "$2x$", "$2y$"];

        if BCRYPT_PREFIXES
            .iter()
            .any(|prefix| hashed.starts_with(prefix))
        {
            HashScheme::Bcrypt
        } else {
            HashScheme::Unknown
        }
    }
}

impl PasswordHasher {
    /// Create a hasher with the default cost.
    pub fn new() -> Self {
        Self::with_cost(DEFAULT_COST)
    }

    /// Create a hasher with an explicit bcrypt cost (4 to 31).
    pub fn with_cost(cost: u32) -> Self {
        Self { cost }
    }

    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Hash a plaintext password with a random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// Modular crypt string (`$2b$<cost>$<salt+hash>`)
    ///
    /// # Errors
    /// * `Internal` - Password longer than [`MAX_PASSWORD_BYTES`], or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, Error> {
        if password.len() > MAX_PASSWORD_BYTES {
            return Err(Error::new(
                ErrorKind::Internal,
                "password exceeds the maximum hashable length",
            )
            .with_detail("max_bytes", MAX_PASSWORD_BYTES)
            .with_detail("actual_bytes", password.len()));
        }

        bcrypt::hash(password, self.cost).map_err(|e| {
            Error::with_cause(ErrorKind::Internal, "password hashing failed", Cause::error(e))
        })
    }

    /// Verify a candidate password against a stored hash.
    ///
    /// The digest comparison is constant-time.
    ///
    /// # Arguments
    /// * `hashed` - Stored password hash
    /// * `candidate` - Plaintext password to check
    ///
    /// # Errors
    /// * `NotMatch` - Candidate does not match the stored hash
    /// * `Internal` - Stored hash is malformed or uses an unknown scheme
    pub fn verify(&self, hashed: &str, candidate: &str) -> Result<(), Error> {
        match HashScheme::detect(hashed) {
            HashScheme::Bcrypt => verify_bcrypt(hashed, candidate),
            HashScheme::Unknown => Err(malformed_hash(Cause::message("unknown hash scheme"))),
        }
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

fn verify_bcrypt(hashed: &str, candidate: &str) -> Result<(), Error> {
    // Nothing longer than the bcrypt input limit was ever hashed.
    if candidate.len() > MAX_PASSWORD_BYTES {
        return Err(not_match());
    }

    match bcrypt::verify(candidate, hashed) {
        Ok(true) => Ok(()),
        Ok(false) => Err(not_match()),
        Err(e) => Err(malformed_hash(Cause::error(e))),
    }
}

fn not_match() -> Error {
    Error::new(ErrorKind::NotMatch, "password does not match")
}

fn malformed_hash(cause: Cause) -> Error {
    Error::with_cause(ErrorKind::Internal, "stored password hash is malformed", cause)
}
