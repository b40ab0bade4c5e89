use std::sync::Arc;

use arena_core::AppError;
use axum::{
    extract::{Path, State},
    http::{header, HeaderValue},
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::constants::ARCHIVE_CONTENT_DISPOSITION;
use crate::error::HttpAppError;
use crate::state::AppState;

/// Return a stored submission's archive as an attachment.
#[tracing::instrument(skip(state), fields(submission_id = %id, operation = "download_submission"))]
pub async fn download_submission(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response, HttpAppError> {
    let id = Uuid::parse_str(&id).map_err(|_| {
        AppError::InvalidIdentifier(format!("submission id {:?} is not a valid UUID", id))
    })?;

    let submission = state.submissions.find(id).await?;

    tracing::debug!(archive_size = submission.data.len(), "Serving submission archive");

    let content_length = HeaderValue::from(submission.data.len());

    Ok((
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("application/zip"),
            ),
            (
                header::CONTENT_DISPOSITION,
                HeaderValue::from_static(ARCHIVE_CONTENT_DISPOSITION),
            ),
            (header::CONTENT_LENGTH, content_length),
        ],
        submission.data,
    )
        .into_response())
}
