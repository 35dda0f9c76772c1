use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use auth::Error;
use auth::ErrorKind;
use auth::JwtHandler;
use chrono::Utc;
use owner_service::domain::authentication::ports::CredentialLookup;
use owner_service::domain::authentication::service::AuthenticationService;
use owner_service::domain::login::service::LoginService;
use owner_service::domain::owner::models::Owner;
use owner_service::domain::owner::models::OwnerAccount;
use owner_service::inbound::http::router::create_router;

pub const SIGNING_KEY: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

/// bcrypt hash of "veryverysecurepassword".
pub const DEVORATIO_HASH: &str = "$2a$12$hWASkUwEkcS1CbsyRRwoBew5r7qwmXwH4YJyP.S149hghOg77UEQW";

/// Credential store kept in memory, keyed by username and email.
#[derive(Default)]
pub struct InMemoryCredentialLookup {
    accounts: Vec<OwnerAccount>,
    failures: HashMap<String, ErrorKind>,
}

impl InMemoryCredentialLookup {
    pub fn with_account(mut self, account: OwnerAccount) -> Self {
        self.accounts.push(account);
        self
    }

    /// Make lookups of `identifier` fail with `kind`.
    pub fn failing_for(mut self, identifier: &str, kind: ErrorKind) -> Self {
        self.failures.insert(identifier.to_string(), kind);
        self
    }
}

#[async_trait]
impl CredentialLookup for InMemoryCredentialLookup {
    async fn get_by_identifier(&self, identifier: &str) -> Result<OwnerAccount, Error> {
        if let Some(kind) = self.failures.get(identifier) {
            return Err(Error::new(*kind, "credential store failure"));
        }

        self.accounts
            .iter()
            .find(|account| {
                account.owner.username == identifier || account.owner.email == identifier
            })
            .cloned()
            .ok_or_else(|| Error::new(ErrorKind::NotFound, "owner account not found"))
    }
}

pub fn devoratio_account() -> OwnerAccount {
    OwnerAccount {
        owner: Owner {
            id: 1,
            username: "devoratio".to_string(),
            first_name: "Dev".to_string(),
            last_name: "Oratio".to_string(),
            email: "devoratio@example.com".to_string(),
        },
        password_hash: DEVORATIO_HASH.to_string(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application with the "devoratio" account in the store.
    pub async fn spawn() -> Self {
        Self::spawn_with(InMemoryCredentialLookup::default().with_account(devoratio_account()))
            .await
    }

    /// Spawn the application in a background task and return TestApp
    pub async fn spawn_with(lookup: InMemoryCredentialLookup) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let jwt_handler = Arc::new(JwtHandler::new(SIGNING_KEY));
        let authentication_service = Arc::new(AuthenticationService::new(Arc::new(lookup)));
        let login_service = Arc::new(LoginService::new(
            authentication_service,
            Arc::clone(&jwt_handler),
        ));

        let router = create_router(login_service, jwt_handler);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            api_client: reqwest::Client::new(),
            jwt_handler: JwtHandler::new(SIGNING_KEY),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(&format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(&format!("{}{}", self.address, path))
    }
}
