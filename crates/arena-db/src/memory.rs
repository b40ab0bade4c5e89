//! In-memory stores
//!
//! Used by the `memory` store backend for local development and by the API tests.
//! API keys are held in clear text here; the Postgres store keeps only hashes.

use std::collections::HashMap;
use std::sync::Arc;

use arena_core::api_key::extract_key_prefix;
use arena_core::models::{Challenge, NewSubmission, Submission, User};
use arena_core::AppError;
use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::traits::{Challenges, Submissions, Users};

#[derive(Clone, Default)]
pub struct InMemoryChallenges {
    challenges: Arc<RwLock<HashMap<i64, Challenge>>>,
}

impl InMemoryChallenges {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a challenge with the given id, replacing any previous one.
    pub async fn insert(&self, id: i64, name: &str, description: Option<&str>) -> Challenge {
        let challenge = Challenge {
            id,
            name: name.to_string(),
            description: description.map(str::to_string),
            created_at: Utc::now(),
        };
        self.challenges.write().await.insert(id, challenge.clone());
        challenge
    }
}

#[async_trait]
impl Challenges for InMemoryChallenges {
    async fn find(&self, id: i64) -> Result<Challenge, AppError> {
        self.challenges
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("challenge {}", id)))
    }
}

#[derive(Clone, Default)]
pub struct InMemorySubmissions {
    submissions: Arc<RwLock<HashMap<Uuid, Submission>>>,
}

impl InMemorySubmissions {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.submissions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.submissions.read().await.is_empty()
    }
}

#[async_trait]
impl Submissions for InMemorySubmissions {
    async fn find(&self, id: Uuid) -> Result<Submission, AppError> {
        self.submissions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("submission {}", id)))
    }

    async fn add(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        let stored = Submission::from_new(Uuid::new_v4(), submission);
        self.submissions
            .write()
            .await
            .insert(stored.id, stored.clone());
        tracing::debug!(submission_id = %stored.id, "Submission stored in memory");
        Ok(stored)
    }
}

#[derive(Clone, Default)]
pub struct InMemoryUsers {
    users_by_key: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user that authenticates with `api_key`.
    pub async fn insert(&self, name: &str, api_key: &str) -> User {
        let user = User {
            id: Uuid::new_v4(),
            name: name.to_string(),
            api_key_prefix: extract_key_prefix(api_key),
            api_key_hash: String::new(),
            created_at: Utc::now(),
        };
        self.users_by_key
            .write()
            .await
            .insert(api_key.to_string(), user.clone());
        user
    }
}

#[async_trait]
impl Users for InMemoryUsers {
    async fn find_by_api_key(&self, api_key: &str) -> Result<User, AppError> {
        self.users_by_key
            .read()
            .await
            .get(api_key)
            .cloned()
            .ok_or_else(|| AppError::NotFound("user".to_string()))
    }
}
