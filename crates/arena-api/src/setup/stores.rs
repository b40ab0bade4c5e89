//! Store backend selection

use std::sync::Arc;

use anyhow::Result;
use arena_core::{Config, StoreBackend};
use arena_db::{
    ChallengeRepository, InMemoryChallenges, InMemorySubmissions, InMemoryUsers,
    SubmissionRepository, UserRepository,
};

use super::database::setup_database;
use crate::state::AppState;

/// Challenge seeded into the memory backend so uploads work out of the box.
pub const SANDBOX_CHALLENGE_ID: i64 = 1;
const SANDBOX_CHALLENGE_NAME: &str = "sandbox";
const DEV_USER_NAME: &str = "developer";

pub async fn setup_stores(config: Config) -> Result<AppState> {
    match config.store_backend() {
        StoreBackend::Postgres => {
            let pool = setup_database(&config).await?;
            Ok(AppState {
                challenges: Arc::new(ChallengeRepository::new(pool.clone())),
                submissions: Arc::new(SubmissionRepository::new(pool.clone())),
                users: Arc::new(UserRepository::new(pool.clone())),
                db_pool: Some(pool),
                config,
            })
        }
        StoreBackend::Memory => {
            let challenges = InMemoryChallenges::new();
            challenges
                .insert(
                    SANDBOX_CHALLENGE_ID,
                    SANDBOX_CHALLENGE_NAME,
                    Some("Default challenge for local development"),
                )
                .await;

            let users = InMemoryUsers::new();
            match config.dev_api_key() {
                Some(api_key) => {
                    let user = users.insert(DEV_USER_NAME, api_key).await;
                    tracing::info!(user_id = %user.id, "Seeded developer user for memory store");
                }
                None => {
                    tracing::warn!("DEV_API_KEY not set; memory store has no users and every upload will fail authentication");
                }
            }

            tracing::info!("Using in-memory stores; data is lost on restart");

            Ok(AppState {
                challenges: Arc::new(challenges),
                submissions: Arc::new(InMemorySubmissions::new()),
                users: Arc::new(users),
                db_pool: None,
                config,
            })
        }
    }
}
