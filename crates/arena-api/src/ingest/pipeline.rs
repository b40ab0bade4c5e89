//! Submission ingestion
//!
//! Stages run strictly in order and each one short-circuits with `?`:
//! resolve challenge, authenticate, resolve boundary, read parts, stamp,
//! persist. The first failure is the one reported, and nothing is persisted
//! unless every earlier stage succeeded.

use std::sync::Arc;

use arena_core::models::{
    Challenge, Submission, SubmissionDraft, SubmissionResponse, User, UserSummary,
};
use arena_core::AppError;
use arena_db::{Challenges, Submissions, Users};
use axum::body::Body;
use axum::http::HeaderMap;
use bytes::Bytes;
use chrono::Utc;
use futures::{Stream, TryStreamExt};

use super::archive::decode_archive;
use super::boundary::boundary_from_headers;
use super::metadata::decode_metadata;
use super::part::{part_stream, Part, PartKind};
use crate::auth::authenticate;
use crate::state::AppState;

/// Parse a challenge path segment. Only positive integers name a challenge.
pub fn parse_challenge_id(raw: &str) -> Result<i64, AppError> {
    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidIdentifier(format!(
            "challenge id {:?} is not a positive integer",
            raw
        ))),
    }
}

/// A persisted submission together with the records it was stamped with
#[derive(Debug, Clone)]
pub struct IngestedSubmission {
    pub submission: Submission,
    pub user: User,
    pub challenge: Challenge,
}

impl IngestedSubmission {
    pub fn to_response(&self) -> SubmissionResponse {
        SubmissionResponse::new(
            &self.submission,
            UserSummary::from(&self.user),
            self.challenge.clone(),
        )
    }
}

#[derive(Clone)]
pub struct SubmissionIngest {
    challenges: Arc<dyn Challenges>,
    users: Arc<dyn Users>,
    submissions: Arc<dyn Submissions>,
}

impl SubmissionIngest {
    pub fn new(
        challenges: Arc<dyn Challenges>,
        users: Arc<dyn Users>,
        submissions: Arc<dyn Submissions>,
    ) -> Self {
        Self {
            challenges,
            users,
            submissions,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.challenges.clone(),
            state.users.clone(),
            state.submissions.clone(),
        )
    }

    pub async fn ingest(
        &self,
        challenge_id: &str,
        headers: &HeaderMap,
        body: Body,
    ) -> Result<IngestedSubmission, AppError> {
        self.ingest_stream(challenge_id, headers, body.into_data_stream())
            .await
    }

    pub async fn ingest_stream<S, E>(
        &self,
        challenge_id: &str,
        headers: &HeaderMap,
        body: S,
    ) -> Result<IngestedSubmission, AppError>
    where
        S: Stream<Item = Result<Bytes, E>> + Send + 'static,
        E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
    {
        let challenge = self.resolve_challenge(challenge_id).await?;
        let user = authenticate(self.users.as_ref(), headers).await?;
        let boundary = boundary_from_headers(headers)?;
        let draft = read_submission(body, boundary).await?;
        let submission = self.store(draft, &user, &challenge).await?;

        Ok(IngestedSubmission {
            submission,
            user,
            challenge,
        })
    }

    async fn resolve_challenge(&self, raw: &str) -> Result<Challenge, AppError> {
        let id = parse_challenge_id(raw)?;
        self.challenges.find(id).await
    }

    async fn store(
        &self,
        draft: SubmissionDraft,
        user: &User,
        challenge: &Challenge,
    ) -> Result<Submission, AppError> {
        let new_submission = draft.stamp(user.id, challenge.id, Utc::now());
        self.submissions.add(new_submission).await
    }
}

/// Fold every part of a multipart body into a draft.
///
/// Metadata parts are merged in order, the last archive part wins and
/// unrecognized parts are skipped.
pub async fn read_submission<S, E>(body: S, boundary: String) -> Result<SubmissionDraft, AppError>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    part_stream(body, boundary)
        .try_fold(SubmissionDraft::default(), apply_part)
        .await
}

async fn apply_part(mut draft: SubmissionDraft, part: Part) -> Result<SubmissionDraft, AppError> {
    let kind = part.kind().clone();
    match kind {
        PartKind::Metadata => {
            draft.metadata = decode_metadata(std::mem::take(&mut draft.metadata), part).await?
        }
        PartKind::Archive => draft.data = decode_archive(part).await?,
        PartKind::Unrecognized(media_type) => {
            tracing::debug!(media_type = %media_type, "Skipping unrecognized part");
        }
    }
    Ok(draft)
}

#[cfg(test)]
mod tests {
    use super::super::part::test_support::*;
    use super::*;
    use arena_db::{InMemoryChallenges, InMemorySubmissions, InMemoryUsers};
    use axum::http::{header, HeaderValue};

    const API_KEY: &str = "ca_live_pipeline_test_key";

    struct Fixture {
        ingest: SubmissionIngest,
        submissions: InMemorySubmissions,
        user: User,
    }

    async fn fixture() -> Fixture {
        let challenges = InMemoryChallenges::new();
        challenges.insert(7, "anagrams", None).await;
        let users = InMemoryUsers::new();
        let user = users.insert("grace", API_KEY).await;
        let submissions = InMemorySubmissions::new();

        Fixture {
            ingest: SubmissionIngest::new(
                Arc::new(challenges),
                Arc::new(users),
                Arc::new(submissions.clone()),
            ),
            submissions,
            user,
        }
    }

    fn headers(api_key: Option<&'static str>, content_type: Option<&'static str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(key) = api_key {
            headers.insert("auth-apikey", HeaderValue::from_static(key));
        }
        if let Some(content_type) = content_type {
            headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
        }
        headers
    }

    fn multipart_content_type() -> &'static str {
        "multipart/mixed; boundary=arena-test-boundary"
    }

    #[test]
    fn challenge_id_must_be_a_positive_integer() {
        assert_eq!(parse_challenge_id("42").unwrap(), 42);
        for raw in ["abc", "", "0", "-3", "1.5", "99999999999999999999"] {
            assert!(matches!(
                parse_challenge_id(raw),
                Err(AppError::InvalidIdentifier(_))
            ));
        }
    }

    #[tokio::test]
    async fn stores_stamped_submission() {
        let fixture = fixture().await;
        let body = multipart_body(&[
            section(&["Content-Type: application/zip"], b"PK-archive"),
            section(&["Content-Type: application/json"], br#"{"name":"a.rs"}"#),
        ]);

        let before = Utc::now();
        let ingested = fixture
            .ingest
            .ingest_stream(
                "7",
                &headers(Some(API_KEY), Some(multipart_content_type())),
                body_stream(body),
            )
            .await
            .unwrap();

        assert_eq!(ingested.submission.user_id, fixture.user.id);
        assert_eq!(ingested.submission.challenge_id, 7);
        assert_eq!(ingested.submission.data, b"PK-archive".to_vec());
        assert_eq!(ingested.submission.metadata.name.as_deref(), Some("a.rs"));
        assert!(ingested.submission.created_at >= before);
        assert_eq!(fixture.submissions.len().await, 1);

        let response = ingested.to_response();
        assert_eq!(response.archive_size, 10);
        assert_eq!(response.user.name, "grace");
        assert_eq!(response.challenge.name, "anagrams");
    }

    #[tokio::test]
    async fn challenge_is_resolved_before_authentication() {
        let fixture = fixture().await;

        let err = fixture
            .ingest
            .ingest_stream("nope", &headers(None, None), body_stream(Vec::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidIdentifier(_)));

        let err = fixture
            .ingest
            .ingest_stream("8", &headers(None, None), body_stream(Vec::new()))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert!(fixture.submissions.is_empty().await);
    }

    #[tokio::test]
    async fn authentication_is_checked_before_content_type() {
        let fixture = fixture().await;
        let err = fixture
            .ingest
            .ingest_stream(
                "7",
                &headers(Some("ca_live_unknown_key_000"), Some("text/plain")),
                body_stream(Vec::new()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AuthenticationFailure));
    }

    #[tokio::test]
    async fn content_type_failure_persists_nothing() {
        let fixture = fixture().await;
        let err = fixture
            .ingest
            .ingest_stream(
                "7",
                &headers(Some(API_KEY), Some("application/json")),
                body_stream(b"{}".to_vec()),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedContentType(_)));
        assert!(fixture.submissions.is_empty().await);
    }

    #[tokio::test]
    async fn decode_failure_stops_before_persisting() {
        let fixture = fixture().await;
        let body = multipart_body(&[
            section(&["Content-Type: application/json"], b"{broken"),
            section(&["Content-Type: application/zip"], b"PK"),
        ]);
        let err = fixture
            .ingest
            .ingest_stream(
                "7",
                &headers(Some(API_KEY), Some(multipart_content_type())),
                body_stream(body),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::DecodeFailure(_)));
        assert!(fixture.submissions.is_empty().await);
    }

    #[tokio::test]
    async fn metadata_parts_merge_and_last_archive_wins() {
        let body = multipart_body(&[
            section(&["Content-Type: application/json"], br#"{"name":"first"}"#),
            section(&["Content-Type: application/zip"], b"first-zip"),
            section(&["Content-Type: image/png"], b"\x89PNG"),
            section(&["Content-Type: application/json"], br#"{"language":"go"}"#),
            section(&["Content-Type: application/zip"], b"second-zip"),
        ]);

        let draft = read_submission(body_stream(body), BOUNDARY.to_string())
            .await
            .unwrap();
        assert_eq!(draft.data, b"second-zip".to_vec());
        assert_eq!(draft.metadata.name.as_deref(), Some("first"));
        assert_eq!(draft.metadata.language.as_deref(), Some("go"));
    }

    #[tokio::test]
    async fn null_metadata_part_keeps_earlier_fields() {
        let body = multipart_body(&[
            section(&["Content-Type: application/json"], br#"{"Name":"kept.go"}"#),
            section(&["Content-Type: application/json"], b"null"),
        ]);

        let draft = read_submission(body_stream(body), BOUNDARY.to_string())
            .await
            .unwrap();
        assert_eq!(draft.metadata.name.as_deref(), Some("kept.go"));
    }

    #[tokio::test]
    async fn truncated_body_is_malformed_and_persists_nothing() {
        let fixture = fixture().await;
        for content_type in ["application/json", "application/zip"] {
            let err = fixture
                .ingest
                .ingest_stream(
                    "7",
                    &headers(Some(API_KEY), Some(multipart_content_type())),
                    body_stream(truncated_body(content_type, br#"{"name":"tru"#)),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::MalformedPart(_)), "{}: {:?}", content_type, err);
        }

        let err = read_submission(
            failing_stream(truncated_body("application/json", b"{")),
            BOUNDARY.to_string(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::MalformedPart(_)));
        assert!(fixture.submissions.is_empty().await);
    }

    #[tokio::test]
    async fn base64_archive_is_decoded() {
        let body = multipart_body(&[section(
            &[
                "Content-Type: application/zip",
                "Content-Transfer-Encoding: base64",
            ],
            b"UEsDBBQAAAAI\r\nAGFyZW5h",
        )]);

        let draft = read_submission(body_stream(body), BOUNDARY.to_string())
            .await
            .unwrap();
        assert_eq!(draft.data, b"PK\x03\x04\x14\x00\x00\x00\x08\x00arena".to_vec());
    }

    #[tokio::test]
    async fn missing_parts_leave_zero_values() {
        let body = multipart_body(&[section(&["Content-Type: text/plain"], b"hi")]);
        let draft = read_submission(body_stream(body), BOUNDARY.to_string())
            .await
            .unwrap();
        assert_eq!(draft, SubmissionDraft::default());
    }
}
