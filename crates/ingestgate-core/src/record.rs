//! Notification records as seen by the filter

use serde::{Deserialize, Serialize};

/// One object-created notification, with the key already decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecord {
    pub bucket: String,
    pub key: String,
    pub size: u64,
}

impl NotificationRecord {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>, size: u64) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            size,
        }
    }
}

/// Decode an object key the way S3 encodes it in event notifications:
/// form-style, so `+` is a space and `%2B` is a literal plus.
///
/// Byte sequences that are not UTF-8 become U+FFFD.
pub fn decode_object_key(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    let bytes = urlencoding::decode_binary(spaced.as_bytes());
    String::from_utf8_lossy(&bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plus_and_percent() {
        assert_eq!(
            decode_object_key("photos/cat%2Bdog.png"),
            "photos/cat+dog.png"
        );
        assert_eq!(
            decode_object_key("my+holiday+pics/beach%20day.JPG"),
            "my holiday pics/beach day.JPG"
        );
        assert_eq!(decode_object_key("plain.pdf"), "plain.pdf");
    }

    #[test]
    fn test_decode_multibyte() {
        assert_eq!(
            decode_object_key("caf%C3%A9/men%C3%BA.pdf"),
            "café/menú.pdf"
        );
    }

    #[test]
    fn test_invalid_utf8_is_replaced() {
        assert_eq!(
            decode_object_key("bad%FF%FE.png"),
            "bad\u{FFFD}\u{FFFD}.png"
        );
        assert_eq!(decode_object_key("trailing%"), "trailing%");
    }
}
