use arena_core::models::SubmissionMetadata;
use arena_core::AppError;
use serde_json::Value;

use super::part::Part;

/// Decode a metadata part on top of the metadata read so far.
pub async fn decode_metadata(
    current: SubmissionMetadata,
    part: Part,
) -> Result<SubmissionMetadata, AppError> {
    let body = part.into_bytes().await?;
    merge_metadata(current, &body)
}

/// Merge a JSON document into `current`, dropping server-owned keys.
///
/// `null` leaves `current` untouched. Any other non-object document is rejected.
pub fn merge_metadata(
    current: SubmissionMetadata,
    body: &[u8],
) -> Result<SubmissionMetadata, AppError> {
    let object = match serde_json::from_slice::<Value>(body)? {
        Value::Null => return Ok(current),
        Value::Object(object) => object,
        other => {
            return Err(AppError::DecodeFailure(format!(
                "invalid JSON metadata: expected an object, found {}",
                json_kind(&other)
            )))
        }
    };

    Ok(current.merged_with(object)?.without_reserved_keys())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
