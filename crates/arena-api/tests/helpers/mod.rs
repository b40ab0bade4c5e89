//! Test helpers: build AppState over in-memory stores and serve the router.
//!
//! Run from workspace root: `cargo test -p arena-api`.

pub mod multipart;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use arena_api::constants;
use arena_api::setup::routes;
use arena_api::state::AppState;
use arena_core::models::{NewSubmission, Submission, User};
use arena_core::{AppError, BaseConfig, Config, StoreBackend};
use arena_db::{InMemoryChallenges, InMemorySubmissions, InMemoryUsers, Submissions};
use async_trait::async_trait;
use axum_test::TestServer;
use uuid::Uuid;

pub const TEST_API_KEY: &str = "ca_live_integration_test_key_0001";
pub const CHALLENGE_ID: i64 = 3;
pub const CHALLENGE_NAME: &str = "reverse-words";

/// API path prefix for tests (e.g. `/api/v0`).
pub fn api_path(path: &str) -> String {
    format!("{}{}", constants::API_PREFIX, path)
}

pub fn upload_path(challenge_id: &str) -> String {
    api_path(&format!("/challenges/{}/submissions", challenge_id))
}

/// Submissions store that counts `add` calls and can be told to fail them.
#[derive(Clone, Default)]
pub struct RecordingSubmissions {
    inner: InMemorySubmissions,
    adds: Arc<AtomicUsize>,
    failure: Option<String>,
}

impl RecordingSubmissions {
    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Default::default()
        }
    }

    pub fn add_calls(&self) -> usize {
        self.adds.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Submissions for RecordingSubmissions {
    async fn find(&self, id: Uuid) -> Result<Submission, AppError> {
        self.inner.find(id).await
    }

    async fn add(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        self.adds.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(message) => Err(AppError::StorageFailure(message.clone())),
            None => self.inner.add(submission).await,
        }
    }
}

/// Test application: server plus handles on the stores behind it.
pub struct TestApp {
    pub server: TestServer,
    pub submissions: RecordingSubmissions,
    pub user: User,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

fn test_config() -> Config {
    Config {
        base: BaseConfig {
            server_port: 0,
            environment: "test".to_string(),
            db_max_connections: 1,
            db_timeout_seconds: 1,
        },
        store_backend: StoreBackend::Memory,
        database_url: None,
        dev_api_key: None,
    }
}

pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(RecordingSubmissions::default()).await
}

pub async fn setup_test_app_with(submissions: RecordingSubmissions) -> TestApp {
    let challenges = InMemoryChallenges::new();
    challenges
        .insert(CHALLENGE_ID, CHALLENGE_NAME, Some("Reverse the words of a line"))
        .await;

    let users = InMemoryUsers::new();
    let user = users.insert("margaret", TEST_API_KEY).await;

    let state = Arc::new(AppState {
        config: test_config(),
        challenges: Arc::new(challenges),
        submissions: Arc::new(submissions.clone()),
        users: Arc::new(users),
        db_pool: None,
    });

    let server = TestServer::new(routes::setup_routes(state)).expect("test server");

    TestApp {
        server,
        submissions,
        user,
    }
}
