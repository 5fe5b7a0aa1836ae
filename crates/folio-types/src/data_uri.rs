//! `data:` URIs carrying a base64 payload.
//!
//! A stored image keeps its full content as a single text value of the form
//! `data:<mime>;base64,<payload>`, which survives text-only storage and can be
//! handed straight to anything that accepts an image source.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::TypeError;

const SCHEME: &str = "data:";
const BASE64_MARKER: &str = ";base64";

/// A decoded data URI: MIME type plus raw bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct DataUri {
    mime_type: String,
    bytes: Vec<u8>,
}

impl DataUri {
    /// Wrap raw bytes with their MIME type.
    pub fn new(mime_type: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            mime_type: mime_type.into(),
            bytes,
        }
    }

    /// Encode bytes straight to the text form without building a `DataUri`.
    pub fn encode(mime_type: &str, bytes: &[u8]) -> String {
        let mut out = String::with_capacity(
            SCHEME.len() + mime_type.len() + BASE64_MARKER.len() + 1 + bytes.len().div_ceil(3) * 4,
        );
        out.push_str(SCHEME);
        out.push_str(mime_type);
        out.push_str(BASE64_MARKER);
        out.push(',');
        STANDARD.encode_string(bytes, &mut out);
        out
    }

    /// Parse the text form. Only base64 payloads are accepted.
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        let rest = text
            .strip_prefix(SCHEME)
            .ok_or_else(|| TypeError::InvalidDataUri("missing data: scheme".into()))?;
        let (header, payload) = rest
            .split_once(',')
            .ok_or_else(|| TypeError::InvalidDataUri("missing ',' separator".into()))?;
        let header = header
            .strip_suffix(BASE64_MARKER)
            .ok_or_else(|| TypeError::InvalidDataUri("payload is not base64".into()))?;
        // Parameters such as `;charset=` sit between the type and the marker.
        let mime_type = header.split(';').next().unwrap_or_default();
        let bytes = STANDARD
            .decode(payload)
            .map_err(|e| TypeError::InvalidBase64(e.to_string()))?;
        Ok(Self::new(mime_type, bytes))
    }

    /// The MIME type embedded in the header (may be empty).
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// The decoded payload.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Consume and return the decoded payload.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Display for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&Self::encode(&self.mime_type, &self.bytes))
    }
}

impl fmt::Debug for DataUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataUri")
            .field("mime_type", &self.mime_type)
            .field("len", &self.bytes.len())
            .finish()
    }
}
