use arena_core::models::{NewSubmission, Submission, SubmissionMetadata};
use arena_core::AppError;
use chrono::{DateTime, Utc};
use sqlx::types::Json;
use sqlx::{FromRow, PgPool, Postgres};
use uuid::Uuid;

/// Submission row as stored in the database
#[derive(Debug, FromRow)]
struct SubmissionRow {
    id: Uuid,
    user_id: Uuid,
    challenge_id: i64,
    created_at: DateTime<Utc>,
    metadata: Json<SubmissionMetadata>,
    data: Vec<u8>,
}

impl From<SubmissionRow> for Submission {
    fn from(row: SubmissionRow) -> Self {
        Submission {
            id: row.id,
            user_id: row.user_id,
            challenge_id: row.challenge_id,
            created_at: row.created_at,
            metadata: row.metadata.0,
            data: row.data,
        }
    }
}

#[derive(Clone)]
pub struct SubmissionRepository {
    pool: PgPool,
}

impl SubmissionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a stamped submission; the database assigns the identifier.
    #[tracing::instrument(
        skip(self, submission),
        fields(
            db.table = "submissions",
            db.operation = "insert",
            challenge_id = submission.challenge_id,
            user_id = %submission.user_id,
            archive_size = submission.data.len()
        )
    )]
    pub async fn create(&self, submission: NewSubmission) -> Result<Submission, AppError> {
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO submissions (user_id, challenge_id, created_at, metadata, data)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(submission.user_id)
        .bind(submission.challenge_id)
        .bind(submission.created_at)
        .bind(Json(&submission.metadata))
        .bind(&submission.data)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to insert submission");
            AppError::StorageFailure(e.to_string())
        })?;

        tracing::info!(submission_id = %id, "Submission stored");

        Ok(Submission::from_new(id, submission))
    }

    /// Get submission by ID, archive included
    #[tracing::instrument(skip(self), fields(db.table = "submissions", db.operation = "select"))]
    pub async fn get_by_id(&self, id: Uuid) -> Result<Option<Submission>, AppError> {
        let row = sqlx::query_as::<Postgres, SubmissionRow>(
            r#"
            SELECT id, user_id, challenge_id, created_at, metadata, data
            FROM submissions
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id = %id, "Failed to get submission");
            AppError::from(e)
        })?;

        Ok(row.map(Submission::from))
    }
}
