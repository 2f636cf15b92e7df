#![allow(dead_code)]

use chrono::{Duration, Utc};
use client_core::token_store::{ACCESS_TOKEN_KEY, REFRESH_TOKEN_KEY};
use client_core::{MemoryTokenStore, TokenStore};
use edu_client::config::Settings;
use edu_client::services::RecordingNotifier;
use edu_client::utils::jwt::encode_unsigned;
use edu_client::AuthContext;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TEST_EMAIL: &str = "test@example.com";
pub const TEST_PASSWORD: &str = "password123";

pub struct TestClient {
    pub server: MockServer,
    pub tokens: Arc<MemoryTokenStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub context: AuthContext,
}

impl TestClient {
    pub async fn spawn() -> Self {
        Self::spawn_with(|_| {}).await
    }

    pub async fn spawn_with(customize: impl FnOnce(&mut Settings)) -> Self {
        let server = MockServer::start().await;

        let mut settings = Settings::for_base_url(server.uri());
        customize(&mut settings);

        let tokens = Arc::new(MemoryTokenStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let context = AuthContext::new(&settings, tokens.clone(), notifier.clone())
            .expect("Failed to build auth context");

        Self {
            server,
            tokens,
            notifier,
            context,
        }
    }

    pub fn store_tokens(&self, access: &str, refresh: &str) {
        self.tokens.set(ACCESS_TOKEN_KEY, access);
        self.tokens.set(REFRESH_TOKEN_KEY, refresh);
    }

    pub fn access_token(&self) -> Option<String> {
        self.tokens.get(ACCESS_TOKEN_KEY)
    }

    pub fn refresh_token(&self) -> Option<String> {
        self.tokens.get(REFRESH_TOKEN_KEY)
    }

    /// Sign in as a student whose access token is `access`.
    pub async fn login_as_student(&self, access: &str, refresh: &str) {
        mount_login(&self.server, access, refresh).await;
        mount_profile(&self.server, access, student_profile()).await;

        self.context
            .login(TEST_EMAIL, TEST_PASSWORD)
            .await
            .expect("Login against mock server failed");
        self.notifier.drain();
    }
}

/// Unsigned JWT for `sub` expiring `expires_in_secs` from now (negative for past).
pub fn jwt(sub: &str, expires_in_secs: i64) -> String {
    let exp = (Utc::now() + Duration::seconds(expires_in_secs)).timestamp();
    encode_unsigned(&json!({ "sub": sub, "exp": exp }))
}

pub fn student_profile() -> Value {
    json!({
        "id": 17,
        "email": TEST_EMAIL,
        "role": "student",
        "first_name": "Sam",
        "last_name": "Lee"
    })
}

pub fn admin_profile() -> Value {
    json!({
        "id": 1,
        "email": "admin@example.com",
        "role": "admin"
    })
}

pub fn token_body(access: &str, refresh: &str) -> Value {
    json!({ "access_token": access, "refresh_token": refresh })
}

pub async fn mount_login(server: &MockServer, access: &str, refresh: &str) {
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_body(access, refresh)))
        .mount(server)
        .await;
}

pub async fn mount_profile(server: &MockServer, access: &str, profile: Value) {
    Mock::given(method("GET"))
        .and(path("/users/me"))
        .and(header("Authorization", format!("Bearer {}", access).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(profile))
        .mount(server)
        .await;
}
