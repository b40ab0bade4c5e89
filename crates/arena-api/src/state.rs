use std::sync::Arc;

use arena_core::Config;
use arena_db::{Challenges, Submissions, Users};
use sqlx::PgPool;

/// Shared handler state
///
/// Stores are held behind their contracts; either backend can be wired in.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub challenges: Arc<dyn Challenges>,
    pub submissions: Arc<dyn Submissions>,
    pub users: Arc<dyn Users>,
    /// Present only with the Postgres backend
    pub db_pool: Option<PgPool>,
}
