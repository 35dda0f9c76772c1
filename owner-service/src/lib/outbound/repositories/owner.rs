use async_trait::async_trait;
use auth::Cause;
use auth::Error;
use auth::ErrorKind;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;

use crate::domain::authentication::ports::CredentialLookup;
use crate::domain::owner::models::Owner;
use crate::domain::owner::models::OwnerAccount;

pub struct PostgresOwnerRepository {
    pool: PgPool,
}

impl PostgresOwnerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OwnerAccountRow {
    id: i64,
    username: String,
    first_name: String,
    last_name: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<OwnerAccountRow> for OwnerAccount {
    fn from(row: OwnerAccountRow) -> Self {
        Self {
            owner: Owner {
                id: row.id,
                username: row.username,
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
            },
            password_hash: row.password_hash,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl CredentialLookup for PostgresOwnerRepository {
    async fn get_by_identifier(&self, identifier: &str) -> Result<OwnerAccount, Error> {
        let row = sqlx::query_as::<_, OwnerAccountRow>(
            r#"
            SELECT id, username, first_name, last_name, email, password_hash, created_at, updated_at
            FROM owners
            WHERE username = $1 OR email = $1
            LIMIT 1
            "#,
        )
        .bind(identifier)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to query owner account");
            Error::with_cause(ErrorKind::Internal, "failed to query owner account", Cause::error(e))
        })?;

        row.map(OwnerAccount::from)
            .ok_or_else(|| Error::new(ErrorKind::NotFound, "owner account not found"))
    }
}
