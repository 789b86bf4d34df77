//! Inline image payloads in the base64 form the classifier expects.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// MIME type assumed when a bare base64 string carries no header.
pub const DEFAULT_MIME_TYPE: &str = "image/jpeg";

/// Errors raised while preparing an inline image payload.
#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("Image payload is empty")]
    Empty,
    #[error("Unsupported data URI header: {0}")]
    UnsupportedHeader(String),
    #[error("Image payload is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),
}

/// Base64 image data plus its declared MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImagePayload {
    mime_type: String,
    data: String,
}

impl ImagePayload {
    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Result<Self, PayloadError> {
        if bytes.is_empty() {
            return Err(PayloadError::Empty);
        }
        Ok(Self {
            mime_type: mime_type.into(),
            data: STANDARD.encode(bytes),
        })
    }

    /// Accept `data:<mime>;base64,<data>` or a bare base64 string.
    pub fn from_data_uri(uri: &str) -> Result<Self, PayloadError> {
        let trimmed = uri.trim();
        let (mime_type, data) = match trimmed.split_once(',') {
            Some((header, data)) => (parse_header(header)?, data.trim()),
            None => (DEFAULT_MIME_TYPE.to_string(), trimmed),
        };
        if data.is_empty() {
            return Err(PayloadError::Empty);
        }
        STANDARD.decode(data)?;
        Ok(Self {
            mime_type,
            data: data.to_string(),
        })
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Base64 text without any header.
    pub fn base64_data(&self) -> &str {
        &self.data
    }

    pub fn to_data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn parse_header(header: &str) -> Result<String, PayloadError> {
    let mime = header
        .trim()
        .strip_prefix("data:")
        .and_then(|rest| rest.strip_suffix(";base64"))
        .ok_or_else(|| PayloadError::UnsupportedHeader(header.trim().to_string()))?
        .trim();
    if mime.is_empty() {
        return Ok(DEFAULT_MIME_TYPE.to_string());
    }
    Ok(mime.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_data_uri_with_mime() {
        let payload = ImagePayload::from_data_uri("data:image/png;base64,AQID").unwrap();
        assert_eq!(payload.mime_type(), "image/png");
        assert_eq!(payload.base64_data(), "AQID");
    }

    #[test]
    fn bare_base64_defaults_to_jpeg() {
        let payload = ImagePayload::from_data_uri("AQID").unwrap();
        assert_eq!(payload.mime_type(), DEFAULT_MIME_TYPE);
        assert_eq!(payload.to_data_uri(), "data:image/jpeg;base64,AQID");
    }

    #[test]
    fn missing_mime_in_header_defaults_to_jpeg() {
        let payload = ImagePayload::from_data_uri("data:;base64,AQID").unwrap();
        assert_eq!(payload.mime_type(), DEFAULT_MIME_TYPE);
    }

    #[test]
    fn rejects_non_base64_headers() {
        let err = ImagePayload::from_data_uri("data:image/png,AQID").unwrap_err();
        assert!(matches!(err, PayloadError::UnsupportedHeader(_)));
    }

    #[test]
    fn rejects_invalid_base64() {
        let err = ImagePayload::from_data_uri("data:image/png;base64,@@@").unwrap_err();
        assert!(matches!(err, PayloadError::Base64(_)));
    }

    #[test]
    fn rejects_empty_inputs() {
        assert!(matches!(
            ImagePayload::from_data_uri("data:image/png;base64,"),
            Err(PayloadError::Empty)
        ));
        assert!(matches!(
            ImagePayload::from_bytes(&[], "image/png"),
            Err(PayloadError::Empty)
        ));
    }
}
