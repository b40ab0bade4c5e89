//! Archive part decoding
//!
//! The archive is stored as opaque bytes. A part marked
//! `Content-Transfer-Encoding: base64` is decoded chunk by chunk as it arrives;
//! line breaks inside the encoded text are ignored.

use arena_core::AppError;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::part::Part;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferEncoding {
    Identity,
    Base64,
}

impl TransferEncoding {
    /// Anything other than `base64` (any case, surrounding whitespace ignored) is taken as-is.
    pub fn from_header(value: Option<&str>) -> Self {
        match value {
            Some(value) if value.trim().eq_ignore_ascii_case("base64") => TransferEncoding::Base64,
            _ => TransferEncoding::Identity,
        }
    }
}

pub async fn decode_archive(mut part: Part) -> Result<Vec<u8>, AppError> {
    match TransferEncoding::from_header(part.transfer_encoding()) {
        TransferEncoding::Identity => Ok(part.into_bytes().await?.to_vec()),
        TransferEncoding::Base64 => {
            let mut decoder = Base64Decoder::default();
            while let Some(chunk) = part.next_chunk().await? {
                decoder.feed(&chunk)?;
            }
            decoder.finish()
        }
    }
}

/// Incremental base64 decoder.
///
/// Whole 4-byte quanta are decoded as soon as they are seen. The last quantum
/// is held back until `finish`, since only it may carry padding.
#[derive(Debug, Default)]
struct Base64Decoder {
    pending: Vec<u8>,
    data: Vec<u8>,
}

impl Base64Decoder {
    fn feed(&mut self, chunk: &[u8]) -> Result<(), AppError> {
        self.pending
            .extend(chunk.iter().copied().filter(|b| *b != b'\r' && *b != b'\n'));

        let ready = self.pending.len().saturating_sub(1) / 4 * 4;
        if ready == 0 {
            return Ok(());
        }
        if self.pending[..ready].contains(&b'=') {
            return Err(invalid_base64("data after padding"));
        }

        STANDARD
            .decode_vec(&self.pending[..ready], &mut self.data)
            .map_err(invalid_base64)?;
        self.pending.drain(..ready);
        Ok(())
    }

    fn finish(mut self) -> Result<Vec<u8>, AppError> {
        if !self.pending.is_empty() {
            STANDARD
                .decode_vec(&self.pending, &mut self.data)
                .map_err(invalid_base64)?;
        }
        Ok(self.data)
    }
}

fn invalid_base64(err: impl std::fmt::Display) -> AppError {
    AppError::DecodeFailure(format!("invalid base64 archive: {}", err))
}

#[cfg(test)]
mod tests {
    use super::*;

    const ZIP_BYTES: &[u8] = b"PK\x03\x04\x14\x00\x00\x00\x08\x00arena";

    fn decode_chunks(chunks: &[&[u8]]) -> Result<Vec<u8>, AppError> {
        let mut decoder = Base64Decoder::default();
        for chunk in chunks {
            decoder.feed(chunk)?;
        }
        decoder.finish()
    }

    #[test]
    fn recognizes_base64_case_insensitively() {
        assert_eq!(TransferEncoding::from_header(Some("base64")), TransferEncoding::Base64);
        assert_eq!(TransferEncoding::from_header(Some(" Base64 ")), TransferEncoding::Base64);
        assert_eq!(TransferEncoding::from_header(Some("binary")), TransferEncoding::Identity);
        assert_eq!(TransferEncoding::from_header(None), TransferEncoding::Identity);
    }

    #[test]
    fn base64_matches_raw_bytes() {
        // base64 of ZIP_BYTES, wrapped with CRLF like a MIME encoder would
        let data = decode_chunks(&[b"UEsDBBQAAAAI\r\nAGFyZW5h\r\n"]).unwrap();
        assert_eq!(data, ZIP_BYTES);
    }

    #[test]
    fn quanta_split_across_chunks() {
        let data = decode_chunks(&[b"UEsDB", b"BQAAAAI\r", b"\nAG", b"FyZW5h", b"\r\n"]).unwrap();
        assert_eq!(data, ZIP_BYTES);

        let data = decode_chunks(&[b"Q", b"Q=", b"=\r\n"]).unwrap();
        assert_eq!(data, b"A");
    }

    #[test]
    fn line_breaks_only_chunks_are_skipped() {
        let data = decode_chunks(&[b"\r\n", b"\r\n\r\n", b"QQ==", b"\r\n"]).unwrap();
        assert_eq!(data, b"A");
    }

    #[test]
    fn empty_base64_body_is_empty_archive() {
        assert!(decode_chunks(&[]).unwrap().is_empty());
        assert!(decode_chunks(&[b"\r\n"]).unwrap().is_empty());
    }

    #[test]
    fn invalid_base64_is_a_decode_failure() {
        for chunks in [
            &[&b"not*base64!"[..]][..],
            &[&b"UEsD"[..], &b"B*QA"[..], &b"AAAI"[..]][..],
            &[&b"QQ=="[..], &b"QUJD"[..]][..],
            &[&b"QQ"[..]][..],
        ] {
            let err = decode_chunks(chunks).unwrap_err();
            assert!(matches!(err, AppError::DecodeFailure(_)), "{:?}", chunks);
        }
    }
}
