use std::borrow::Cow;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("malformed escape sequence at byte {0}")]
    InvalidEscape(usize),
    #[error("decoded bytes are not valid UTF-8")]
    InvalidUtf8,
}

/// Percent-decode a single path segment.
///
/// Unlike a lenient decoder, every `%` must start a complete two-digit hex escape.
/// `+` is left untouched.
pub fn decode_path_segment(encoded: &str) -> Result<Cow<'_, str>, DecodeError> {
    let bytes = encoded.as_bytes();

    let mut index = 0;
    while let Some(offset) = bytes[index..].iter().position(|byte| *byte == b'%') {
        let start = index + offset;
        match bytes.get(start + 1..start + 3) {
            Some([high, low]) if high.is_ascii_hexdigit() && low.is_ascii_hexdigit() => {
                index = start + 3;
            }
            _ => return Err(DecodeError::InvalidEscape(start)),
        }
    }

    urlencoding::decode(encoded).map_err(|_| DecodeError::InvalidUtf8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_fully_encoded_cdn_url() {
        let decoded = decode_path_segment(
            "https%3A%2F%2Fcdn.discordapp.com%2Fattachments%2F123%2F456%2Fimage.png%3Fex%3Dabc",
        )
        .expect("valid escapes");

        assert_eq!(
            decoded,
            "https://cdn.discordapp.com/attachments/123/456/image.png?ex=abc"
        );
    }

    #[test]
    fn passes_plain_text_through() {
        let decoded = decode_path_segment("123/456/image.png").expect("nothing to decode");
        assert!(matches!(decoded, Cow::Borrowed("123/456/image.png")));
    }

    #[test]
    fn keeps_plus_literal() {
        assert_eq!(decode_path_segment("a+b.png").unwrap(), "a+b.png");
    }

    #[test]
    fn rejects_non_hex_escape() {
        assert_eq!(
            decode_path_segment("123/456/%zzimage.png"),
            Err(DecodeError::InvalidEscape(8))
        );
    }

    #[test]
    fn rejects_truncated_escape() {
        assert_eq!(decode_path_segment("abc%4"), Err(DecodeError::InvalidEscape(3)));
        assert_eq!(decode_path_segment("%"), Err(DecodeError::InvalidEscape(0)));
    }

    #[test]
    fn decoded_percent_is_not_decoded_twice() {
        assert_eq!(decode_path_segment("100%25zz.txt").unwrap(), "100%zz.txt");
    }

    #[test]
    fn rejects_invalid_utf8() {
        assert_eq!(decode_path_segment("%ff%fe"), Err(DecodeError::InvalidUtf8));
    }

    #[test]
    fn decodes_multibyte_characters() {
        assert_eq!(
            decode_path_segment("1/2/%E3%83%95%E3%82%A1%E3%82%A4%E3%83%AB.png").unwrap(),
            "1/2/ファイル.png"
        );
    }
}
