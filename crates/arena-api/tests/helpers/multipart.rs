//! Hand-built multipart bodies, so tests control every part header.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

pub const BOUNDARY: &str = "----arena-boundary-7MA4YWxkTrZu0gW";

/// A few bytes that start like a zip local file header
pub const ZIP_BYTES: &[u8] = b"PK\x03\x04\x14\x00\x00\x00\x08\x00submission-archive\xff\x00\x7f";

pub fn content_type() -> String {
    format!("multipart/mixed; boundary={}", BOUNDARY)
}

#[derive(Default)]
pub struct MultipartBuilder {
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn part(mut self, headers: &[(&str, &str)], content: &[u8]) -> Self {
        self.body
            .extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        for (name, value) in headers {
            self.body
                .extend_from_slice(format!("{}: {}\r\n", name, value).as_bytes());
        }
        self.body.extend_from_slice(b"\r\n");
        self.body.extend_from_slice(content);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn metadata(self, json: &str) -> Self {
        self.part(
            &[
                ("Content-Disposition", "form-data; name=\"metadata\""),
                ("Content-Type", "application/json"),
            ],
            json.as_bytes(),
        )
    }

    pub fn archive(self, data: &[u8]) -> Self {
        self.part(
            &[
                ("Content-Disposition", "form-data; name=\"code\"; filename=\"code.zip\""),
                ("Content-Type", "application/zip"),
            ],
            data,
        )
    }

    /// Archive part sent base64-encoded, wrapped at 76 columns.
    pub fn archive_base64(self, data: &[u8], encoding_header: &str) -> Self {
        let encoded = STANDARD.encode(data);
        let wrapped = encoded
            .as_bytes()
            .chunks(76)
            .map(|line| std::str::from_utf8(line).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\r\n");
        self.part(
            &[
                ("Content-Disposition", "form-data; name=\"code\"; filename=\"code.zip\""),
                ("Content-Type", "application/zip"),
                ("Content-Transfer-Encoding", encoding_header),
            ],
            wrapped.as_bytes(),
        )
    }

    pub fn build(mut self) -> Vec<u8> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
        self.body
    }
}
