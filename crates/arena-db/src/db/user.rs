use arena_core::api_key::{extract_key_prefix, verify_api_key};
use arena_core::models::User;
use arena_core::AppError;
use sqlx::{PgPool, Postgres};

#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a user holding an already-hashed API key
    #[tracing::instrument(skip(self, key_hash), fields(db.table = "users", db.operation = "insert"))]
    pub async fn create(
        &self,
        name: &str,
        key_hash: String,
        key_prefix: String,
    ) -> Result<User, AppError> {
        let user = sqlx::query_as::<Postgres, User>(
            r#"
            INSERT INTO users (name, api_key_hash, api_key_prefix)
            VALUES ($1, $2, $3)
            RETURNING id, name, api_key_prefix, api_key_hash, created_at
            "#,
        )
        .bind(name)
        .bind(&key_hash)
        .bind(&key_prefix)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create user");
            AppError::from(e)
        })?;

        tracing::info!(user_id = %user.id, name = %user.name, "User created");

        Ok(user)
    }

    /// Resolve a user by API key: narrow by prefix, then verify the hash.
    #[tracing::instrument(skip(self, api_key), fields(db.table = "users", db.operation = "select"))]
    pub async fn get_by_api_key(&self, api_key: &str) -> Result<Option<User>, AppError> {
        let prefix = extract_key_prefix(api_key);

        let candidates = sqlx::query_as::<Postgres, User>(
            r#"
            SELECT id, name, api_key_prefix, api_key_hash, created_at FROM users
            WHERE api_key_prefix = $1
            "#,
        )
        .bind(&prefix)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to get users by key prefix");
            AppError::from(e)
        })?;

        for user in candidates {
            if verify_api_key(api_key, &user.api_key_hash)? {
                return Ok(Some(user));
            }
        }

        Ok(None)
    }
}
