use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use super::{Challenge, UserSummary};

/// Metadata keys owned by the server. They are dropped from client-supplied JSON.
pub const RESERVED_METADATA_KEYS: &[&str] = &[
    "id",
    "user",
    "user_id",
    "challenge",
    "challenge_id",
    "created",
    "created_at",
    "data",
    "archive_size",
];

/// Keys decoded into the typed fields of `SubmissionMetadata`
const KNOWN_METADATA_KEYS: &[&str] = &["name", "language", "description"];

/// Free-form submission metadata, populated from the JSON part of an upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubmissionMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Any other fields the client sent
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SubmissionMetadata {
    /// Remove server-owned keys from the free-form fields, ignoring case.
    pub fn without_reserved_keys(mut self) -> Self {
        self.extra.retain(|key, _| {
            !RESERVED_METADATA_KEYS
                .iter()
                .any(|reserved| reserved.eq_ignore_ascii_case(key))
        });
        self
    }

    /// Overlay a JSON object onto this metadata.
    ///
    /// Keys missing from `object` keep their current value, and so do known
    /// fields set to `null`. Known fields match their key case-insensitively.
    pub fn merged_with(self, object: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let mut fields = match serde_json::to_value(self)? {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };

        for (key, value) in object {
            match KNOWN_METADATA_KEYS
                .iter()
                .find(|known| known.eq_ignore_ascii_case(&key))
            {
                Some(_) if value.is_null() => {}
                Some(known) => {
                    fields.insert(known.to_string(), value);
                }
                None => {
                    fields.insert(key, value);
                }
            }
        }

        serde_json::from_value(Value::Object(fields))
    }
}

/// Submission state accumulated while reading a multipart upload.
///
/// A draft that never saw a metadata or archive part keeps the zero value for it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubmissionDraft {
    pub metadata: SubmissionMetadata,
    pub data: Vec<u8>,
}

impl SubmissionDraft {
    /// Stamp the draft with its owner, challenge and creation time.
    pub fn stamp(self, user_id: Uuid, challenge_id: i64, created_at: DateTime<Utc>) -> NewSubmission {
        NewSubmission {
            user_id,
            challenge_id,
            created_at,
            metadata: self.metadata,
            data: self.data,
        }
    }
}

/// A fully stamped submission ready for the submissions store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSubmission {
    pub user_id: Uuid,
    pub challenge_id: i64,
    pub created_at: DateTime<Utc>,
    pub metadata: SubmissionMetadata,
    pub data: Vec<u8>,
}

/// A persisted submission
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Submission {
    pub id: Uuid,
    pub user_id: Uuid,
    pub challenge_id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub metadata: SubmissionMetadata,
    #[serde(skip)]
    pub data: Vec<u8>,
}

impl Submission {
    pub fn from_new(id: Uuid, new: NewSubmission) -> Self {
        Self {
            id,
            user_id: new.user_id,
            challenge_id: new.challenge_id,
            created_at: new.created_at,
            metadata: new.metadata,
            data: new.data,
        }
    }
}

/// Submission as returned by the upload endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub user: UserSummary,
    pub challenge: Challenge,
    /// Size of the stored archive in bytes
    pub archive_size: usize,
    #[serde(flatten)]
    pub metadata: SubmissionMetadata,
}

impl SubmissionResponse {
    pub fn new(submission: &Submission, user: UserSummary, challenge: Challenge) -> Self {
        Self {
            id: submission.id,
            created_at: submission.created_at,
            user,
            challenge,
            archive_size: submission.data.len(),
            metadata: submission.metadata.clone(),
        }
    }
}
