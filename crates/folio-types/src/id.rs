use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a stored image.
///
/// Freshly ingested images get `img_<unix-millis>_<suffix>`, where the suffix
/// is a short random token. The timestamp keeps ids ordered within a session
/// and the suffix separates ids minted in the same millisecond.
///
/// Ids read back from storage are taken verbatim: the collection is the
/// authority on what ids exist, not this type.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageId(String);

impl ImageId {
    /// Prefix carried by every generated id.
    pub const PREFIX: &'static str = "img_";

    /// Build a fresh id from a millisecond timestamp and a random token.
    pub fn generate(unix_millis: i64, token: &str) -> Self {
        Self(format!("{}{}_{}", Self::PREFIX, unix_millis, token))
    }

    /// Wrap an existing id string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for log lines and narrow listings (last 9 characters).
    pub fn short(&self) -> &str {
        let start = self
            .0
            .char_indices()
            .rev()
            .nth(8)
            .map(|(i, _)| i)
            .unwrap_or(0);
        &self.0[start..]
    }

    /// Consume the id and return the inner string.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Debug for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ImageId({})", self.0)
    }
}

impl fmt::Display for ImageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ImageId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ImageId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl AsRef<str> for ImageId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ImageId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ImageId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
