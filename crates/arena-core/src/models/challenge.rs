use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A coding challenge that submissions are filed against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Challenge {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a challenge
#[derive(Debug, Clone, Deserialize)]
pub struct CreateChallengeRequest {
    pub name: String,
    pub description: Option<String>,
}
