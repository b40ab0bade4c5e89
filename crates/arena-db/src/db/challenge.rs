use arena_core::models::{Challenge, CreateChallengeRequest};
use arena_core::AppError;
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct ChallengeRepository {
    pool: PgPool,
}

impl ChallengeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new challenge
    #[tracing::instrument(skip(self), fields(db.table = "challenges", db.operation = "insert"))]
    pub async fn create(&self, request: &CreateChallengeRequest) -> Result<Challenge, AppError> {
        let challenge = sqlx::query_as::<Postgres, Challenge>(
            r#"
            INSERT INTO challenges (name, description)
            VALUES ($1, $2)
            RETURNING id, name, description, created_at
            "#,
        )
        .bind(&request.name)
        .bind(&request.description)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create challenge");
            AppError::from(e)
        })?;

        tracing::info!(challenge_id = challenge.id, name = %challenge.name, "Challenge created");

        Ok(challenge)
    }

    /// Get challenge by ID
    #[tracing::instrument(skip(self), fields(db.table = "challenges", db.operation = "select"))]
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Challenge>, AppError> {
        sqlx::query_as::<Postgres, Challenge>(
            r#"
            SELECT id, name, description, created_at FROM challenges
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id = id, "Failed to get challenge");
            AppError::from(e)
        })
    }

    /// List challenges, newest first
    #[tracing::instrument(skip(self), fields(db.table = "challenges", db.operation = "select"))]
    pub async fn list(&self, limit: i64, offset: i64) -> Result<Vec<Challenge>, AppError> {
        sqlx::query_as::<Postgres, Challenge>(
            r#"
            SELECT id, name, description, created_at FROM challenges
            ORDER BY id DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to list challenges");
            AppError::from(e)
        })
    }
}
