use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data_uri::DataUri;
use crate::error::TypeError;
use crate::id::ImageId;
use crate::size::human_size;

/// One stored image.
///
/// Records are immutable once stored: the collection only ever appends or
/// removes whole records. The serialized field names (`type`, `uploadedAt`)
/// are the on-storage format and must not change.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageRecord {
    /// Unique identifier, minted at ingestion.
    pub id: ImageId,
    /// Original file name. Display only, never used as a path.
    pub name: String,
    /// Full file content as a `data:` URI.
    pub data: String,
    /// Byte length of the original file (before encoding).
    pub size: u64,
    /// MIME type as reported by the source file.
    #[serde(rename = "type")]
    pub mime_type: String,
    /// Ingestion instant.
    #[serde(with = "iso8601")]
    pub uploaded_at: DateTime<Utc>,
}

impl ImageRecord {
    /// Decode the stored payload.
    pub fn decode(&self) -> Result<DataUri, TypeError> {
        DataUri::parse(&self.data)
    }

    /// Human-readable size (`"2.0 KB"`).
    pub fn size_label(&self) -> String {
        human_size(self.size)
    }
}

/// ISO-8601 with millisecond precision and a `Z` suffix on write; any
/// RFC 3339 timestamp on read.
pub mod iso8601 {
    use chrono::{DateTime, SecondsFormat, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format(value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let text = String::deserialize(deserializer)?;
        DateTime::parse_from_rfc3339(&text)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(serde::de::Error::custom)
    }

    /// Text form used on storage.
    pub fn format(value: &DateTime<Utc>) -> String {
        value.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> ImageRecord {
        ImageRecord {
            id: ImageId::new("img_1760607000000_abc123xyz"),
            name: "avatar.png".into(),
            data: DataUri::encode("image/png", &[0x89, b'P', b'N', b'G']),
            size: 4,
            mime_type: "image/png".into(),
            uploaded_at: Utc.with_ymd_and_hms(2025, 10, 16, 9, 30, 0).unwrap(),
        }
    }

    #[test]
    fn wire_field_names() {
        let json = serde_json::to_value(sample()).unwrap();
        let obj = json.as_object().unwrap();
        let mut keys: Vec<&str> = obj.keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["data", "id", "name", "size", "type", "uploadedAt"]);
        assert_eq!(obj["uploadedAt"], "2025-10-16T09:30:00.000Z");
        assert_eq!(obj["type"], "image/png");
    }

    #[test]
    fn reads_browser_written_record() {
        let json = r#"{
            "id": "img_1700000000000_k2j4h5g6f",
            "name": "cat.gif",
            "data": "data:image/gif;base64,R0lG",
            "size": 3,
            "type": "image/gif",
            "uploadedAt": "2023-11-14T22:13:20.000Z"
        }"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.id, "img_1700000000000_k2j4h5g6f");
        assert_eq!(record.uploaded_at.timestamp(), 1_700_000_000);
        assert_eq!(record.decode().unwrap().bytes(), b"GIF");
    }

    #[test]
    fn accepts_offset_timestamps() {
        let json = r#"{"id":"x","name":"n","data":"","size":0,"type":"image/png","uploadedAt":"2024-01-01T07:00:00+07:00"}"#;
        let record: ImageRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.uploaded_at, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn rejects_missing_fields() {
        let json = r#"{"id":"x","name":"n"}"#;
        assert!(serde_json::from_str::<ImageRecord>(json).is_err());
    }

    #[test]
    fn data_string_preserved_exactly() {
        let record = sample();
        let json = serde_json::to_string(&record).unwrap();
        let back: ImageRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
        assert_eq!(back.data, record.data);
    }

    #[test]
    fn size_label_uses_human_size() {
        let mut record = sample();
        record.size = 2048;
        assert_eq!(record.size_label(), "2.0 KB");
    }
}
