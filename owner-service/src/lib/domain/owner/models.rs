use chrono::DateTime;
use chrono::Utc;

/// Site owner identity.
///
/// Carries no secret material; this is what authentication hands back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Owner {
    pub id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}

impl Owner {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Owner together with stored credentials, as read from the credential store.
#[derive(Debug, Clone)]
pub struct OwnerAccount {
    pub owner: Owner,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl OwnerAccount {
    /// Drop the credentials and keep the identity.
    pub fn into_owner(self) -> Owner {
        self.owner
    }
}
