//! Multipart boundary resolution from the request headers

use arena_core::AppError;
use axum::http::{header, HeaderMap};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoundaryError {
    #[error("missing Content-Type header")]
    MissingHeader,

    #[error("Content-Type header is not valid text")]
    NotText,

    #[error("{content_type}: {reason}")]
    Unparsable {
        content_type: String,
        reason: &'static str,
    },

    #[error("{0} is not a multipart media type")]
    NotMultipart(String),

    #[error("{0} has no boundary parameter")]
    MissingBoundary(String),
}

impl From<BoundaryError> for AppError {
    fn from(err: BoundaryError) -> Self {
        AppError::MalformedContentType(err.to_string())
    }
}

/// Resolve the boundary from a raw `Content-Type` value.
///
/// The media type must be `multipart/<anything>` and carry a non-empty `boundary`.
pub fn resolve_boundary(content_type: Option<&str>) -> Result<String, BoundaryError> {
    let content_type = content_type.ok_or(BoundaryError::MissingHeader)?;
    let unparsable = |reason| BoundaryError::Unparsable {
        content_type: content_type.to_string(),
        reason,
    };

    let mut segments = content_type.split(';');
    let essence = segments.next().unwrap_or_default().trim();
    match essence.split_once('/') {
        Some((kind, subtype)) if !kind.is_empty() && !subtype.is_empty() => {
            if !kind.eq_ignore_ascii_case("multipart") {
                return Err(BoundaryError::NotMultipart(content_type.to_string()));
            }
        }
        _ => return Err(unparsable("expected type/subtype")),
    }

    let mut boundary = None;
    for segment in segments.map(str::trim).filter(|s| !s.is_empty()) {
        let (name, value) = segment
            .split_once('=')
            .ok_or_else(|| unparsable("parameter without a value"))?;
        if name.trim().eq_ignore_ascii_case("boundary") {
            boundary = Some(unquote(value.trim()));
        }
    }

    match boundary {
        Some(boundary) if !boundary.is_empty() => Ok(boundary.to_string()),
        _ => Err(BoundaryError::MissingBoundary(content_type.to_string())),
    }
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}

/// Resolve the boundary of a request, classifying any failure as a malformed content type.
pub fn boundary_from_headers(headers: &HeaderMap) -> Result<String, AppError> {
    let content_type = match headers.get(header::CONTENT_TYPE) {
        Some(value) => Some(value.to_str().map_err(|_| BoundaryError::NotText)?),
        None => None,
    };
    Ok(resolve_boundary(content_type)?)
}
