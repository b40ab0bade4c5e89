//! Multipart part stream and classification
//!
//! Wraps `multer` so the upload handler sees a plain `Stream` of classified
//! parts. A part is only valid until the next one is requested; callers consume
//! or drop it before polling the stream again.

use arena_core::AppError;
use bytes::Bytes;
use futures::Stream;

pub const METADATA_MEDIA_TYPE: &str = "application/json";
pub const ARCHIVE_MEDIA_TYPE: &str = "application/zip";
pub const CONTENT_TRANSFER_ENCODING: &str = "content-transfer-encoding";

/// What a part carries, decided by its `Content-Type` essence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartKind {
    Metadata,
    Archive,
    Unrecognized(String),
}

impl PartKind {
    /// `essence` is the lowercased `type/subtype` without parameters.
    pub fn classify(essence: &str) -> Self {
        match essence {
            METADATA_MEDIA_TYPE => PartKind::Metadata,
            ARCHIVE_MEDIA_TYPE => PartKind::Archive,
            other => PartKind::Unrecognized(other.to_string()),
        }
    }
}

pub struct Part {
    kind: PartKind,
    transfer_encoding: Option<String>,
    field: multer::Field<'static>,
}

impl Part {
    fn from_field(field: multer::Field<'static>) -> Result<Self, AppError> {
        let headers = field.headers();

        let raw = headers
            .get(axum::http::header::CONTENT_TYPE)
            .ok_or_else(|| AppError::MalformedPart("part has no Content-Type".to_string()))?;

        // multer leaves content_type() empty when the header does not parse
        let essence = field
            .content_type()
            .map(|mime| mime.essence_str().to_string())
            .ok_or_else(|| {
                AppError::MalformedPart(format!("part Content-Type {:?} is not a media type", raw))
            })?;

        let transfer_encoding = headers
            .get(CONTENT_TRANSFER_ENCODING)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        Ok(Self {
            kind: PartKind::classify(&essence),
            transfer_encoding,
            field,
        })
    }

    pub fn kind(&self) -> &PartKind {
        &self.kind
    }

    /// Raw `Content-Transfer-Encoding` header value, if any
    pub fn transfer_encoding(&self) -> Option<&str> {
        self.transfer_encoding.as_deref()
    }

    /// Read the whole part body.
    pub async fn into_bytes(self) -> Result<Bytes, AppError> {
        self.field.bytes().await.map_err(read_failure)
    }

    /// Next slice of the part body, `None` once the part is exhausted.
    pub async fn next_chunk(&mut self) -> Result<Option<Bytes>, AppError> {
        self.field.chunk().await.map_err(read_failure)
    }
}

/// A body that cannot be read to its closing boundary is a framing problem,
/// whether the stream was cut short or the transport failed.
fn read_failure(err: multer::Error) -> AppError {
    AppError::MalformedPart(format!("failed to read part body: {}", err))
}

/// Split a request body into classified parts.
///
/// The stream ends after the first error.
pub fn part_stream<S, O, E>(
    body: S,
    boundary: String,
) -> impl Stream<Item = Result<Part, AppError>> + Send
where
    S: Stream<Item = Result<O, E>> + Send + 'static,
    O: Into<Bytes> + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let multipart = multer::Multipart::new(body, boundary);

    futures::stream::try_unfold(multipart, |mut multipart| async move {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                let part = Part::from_field(field)?;
                Ok(Some((part, multipart)))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(AppError::MalformedPart(e.to_string())),
        }
    })
}
