use std::sync::Arc;

use arena_core::models::SubmissionResponse;
use axum::{
    extract::{Path, Request, State},
    Json,
};

use crate::error::HttpAppError;
use crate::ingest::SubmissionIngest;
use crate::middleware::get_request_id;
use crate::state::AppState;

/// Accept a multipart submission for a challenge.
///
/// The body carries an `application/json` metadata part and an
/// `application/zip` archive part, in any order; the archive may be sent with
/// `Content-Transfer-Encoding: base64`.
#[tracing::instrument(
    skip(state, request),
    fields(challenge_id = %challenge_id, operation = "upload_submission")
)]
pub async fn upload_submission(
    State(state): State<Arc<AppState>>,
    Path(challenge_id): Path<String>,
    request: Request,
) -> Result<Json<SubmissionResponse>, HttpAppError> {
    let request_id = get_request_id(&request).unwrap_or_default();
    let (parts, body) = request.into_parts();

    let ingested = SubmissionIngest::from_state(&state)
        .ingest(&challenge_id, &parts.headers, body)
        .await?;

    tracing::info!(
        request_id = %request_id,
        submission_id = %ingested.submission.id,
        user_id = %ingested.user.id,
        archive_size = ingested.submission.data.len(),
        "Submission accepted"
    );

    Ok(Json(ingested.to_response()))
}
