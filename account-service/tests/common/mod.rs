use std::sync::Arc;

use account_service::account::models::EmailAddress;
use account_service::account::service::AccountService;
use account_service::inbound::http::router::create_router;
use account_service::outbound::hashing::Argon2CredentialHasher;
use account_service::outbound::repositories::InMemoryAccountRepository;
use auth::Authenticator;
use auth::Claims;
use auth::ManualClock;
use auth::PasswordHasher;
use auth::SigningKey;
use auth::TokenCodec;
use chrono::Duration;
use chrono::Utc;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over an in-memory store
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    pub repository: Arc<InMemoryAccountRepository>,
    pub clock: Arc<ManualClock>,
    pub codec: TokenCodec,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let clock = Arc::new(ManualClock::new(Utc::now()));
        let codec = TokenCodec::with_clock(SigningKey::from_secret(TEST_SECRET), clock.clone());
        let authenticator = Arc::new(Authenticator::new(codec.clone()));

        let repository = Arc::new(InMemoryAccountRepository::new());
        // Cheap Argon2 parameters keep the suite fast.
        let hasher = Arc::new(Argon2CredentialHasher::new(
            PasswordHasher::with_params(1024, 1, 1).expect("Invalid Argon2 parameters"),
        ));

        let account_service = Arc::new(AccountService::new(
            Arc::clone(&repository),
            hasher,
            Arc::clone(&authenticator),
            Duration::hours(24),
        ));

        let router = create_router(account_service, authenticator);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::builder()
                .cookie_store(true)
                .build()
                .expect("Failed to create reqwest client"),
            repository,
            clock,
            codec,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account and assert it was created.
    pub async fn sign_up(&self, email: &str, display_name: &str) -> Value {
        let response = self
            .post("/api/v1/public/signup")
            .json(&json!({
                "email": email,
                "display_name": display_name,
                "password": PASSWORD
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Sign in with the default password and return the response `data`.
    pub async fn sign_in(&self, email: &str) -> Value {
        let response = self
            .post("/api/v1/public/signin")
            .json(&json!({ "email": email, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"].clone()
    }

    /// Register then sign in; returns the access token and the refresh token.
    pub async fn signed_in(&self, email: &str) -> (String, String) {
        self.sign_up(email, "Alice").await;
        let session = self.sign_in(email).await;
        (
            session["token"].as_str().unwrap().to_string(),
            session["refresh_token"].as_str().unwrap().to_string(),
        )
    }

    pub fn decode(&self, token: &str) -> Claims {
        self.codec.decode(token).expect("Failed to decode token")
    }

    /// Drop an account behind the service's back.
    pub async fn delete_account(&self, email: &str) {
        let email = EmailAddress::new(email.to_string()).unwrap();
        self.repository.remove(&email).await;
    }
}
