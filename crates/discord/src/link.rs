//! Attachment link parsing.
//!
//! Accepts either a bare `channel/file/name.ext` path or a full CDN URL such as
//! `https://cdn.discordapp.com/attachments/{channel_id}/{file_id}/{file_name}?ex=..`.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_CDN_BASE_URL: &str = "https://cdn.discordapp.com";

const ATTACHMENTS_MARKER: &str = "attachments/";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LinkError {
    #[error("Invalid link format")]
    Format,
    #[error("Invalid Channel ID")]
    ChannelId,
    #[error("Invalid File ID")]
    FileId,
    #[error("File name must include a file extension")]
    MissingExtension,
}

/// Identity of a single Discord attachment, independent of its signing parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentLink {
    #[serde(rename = "channelID")]
    channel_id: u64,
    #[serde(rename = "fileID")]
    file_id: u64,
    #[serde(rename = "fileName")]
    file_name: String,
}

impl AttachmentLink {
    pub fn channel_id(&self) -> u64 {
        self.channel_id
    }

    pub fn file_id(&self) -> u64 {
        self.file_id
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Canonical unsigned URL on the public CDN.
    pub fn cdn_url(&self) -> String {
        self.cdn_url_with_base(DEFAULT_CDN_BASE_URL)
    }

    pub fn cdn_url_with_base(&self, base_url: &str) -> String {
        format!(
            "{}/{ATTACHMENTS_MARKER}{}/{}/{}",
            base_url.trim_end_matches('/'),
            self.channel_id,
            self.file_id,
            self.file_name
        )
    }
}

impl fmt::Display for AttachmentLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.channel_id, self.file_id, self.file_name)
    }
}

impl std::str::FromStr for AttachmentLink {
    type Err = LinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_link(s)
    }
}

/// Parse an already percent-decoded link into its attachment identity.
///
/// ```
/// use relink_discord::parse_link;
///
/// let link = parse_link("https://cdn.discordapp.com/attachments/123/456/image.png?ex=abc")
///     .expect("link should parse");
/// assert_eq!(link.channel_id(), 123);
/// assert_eq!(link.file_id(), 456);
/// assert_eq!(link.file_name(), "image.png");
/// ```
pub fn parse_link(input: &str) -> Result<AttachmentLink, LinkError> {
    let path = input.split_once('?').map_or(input, |(path, _query)| path);
    let path = path
        .split_once(ATTACHMENTS_MARKER)
        .map_or(path, |(_prefix, rest)| rest);

    let mut segments = path.split('/');
    let (Some(channel), Some(file), Some(file_name), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(LinkError::Format);
    };

    let channel_id = channel.parse::<u64>().map_err(|_| LinkError::ChannelId)?;
    let file_id = file.parse::<u64>().map_err(|_| LinkError::FileId)?;

    if !file_name.contains('.') {
        return Err(LinkError::MissingExtension);
    }

    Ok(AttachmentLink {
        channel_id,
        file_id,
        file_name: file_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bare_path() {
        let link = parse_link("123/456/image.png").unwrap();

        assert_eq!(link.channel_id(), 123);
        assert_eq!(link.file_id(), 456);
        assert_eq!(link.file_name(), "image.png");
    }

    #[test]
    fn full_cdn_url_matches_bare_path() {
        let bare = parse_link("123/456/image.png").unwrap();
        let full =
            parse_link("https://cdn.discordapp.com/attachments/123/456/image.png?ex=abc").unwrap();

        assert_eq!(bare, full);
    }

    #[test]
    fn media_proxy_host_is_accepted() {
        let link = parse_link(
            "https://media.discordapp.net/attachments/1100/2200/clip.final.mp4?ex=1&is=2&hm=3&",
        )
        .unwrap();

        assert_eq!(link.channel_id(), 1100);
        assert_eq!(link.file_id(), 2200);
        assert_eq!(link.file_name(), "clip.final.mp4");
    }

    #[test]
    fn snowflake_sized_ids_fit() {
        let link = parse_link("1189309213371453521/1190000000000000000/a.gif").unwrap();

        assert_eq!(link.channel_id(), 1_189_309_213_371_453_521);
        assert_eq!(link.file_id(), 1_190_000_000_000_000_000);
    }

    #[test]
    fn second_marker_stays_in_remainder() {
        let err = parse_link("attachments/1/2/attachments/3.png").unwrap_err();
        assert_eq!(err, LinkError::Format);
    }

    #[test]
    fn two_segments_is_a_format_error() {
        assert_eq!(parse_link("123/456"), Err(LinkError::Format));
    }

    #[test]
    fn four_segments_is_a_format_error() {
        assert_eq!(parse_link("1/2/3/image.png"), Err(LinkError::Format));
    }

    #[test]
    fn empty_input_is_a_format_error() {
        assert_eq!(parse_link(""), Err(LinkError::Format));
        assert_eq!(parse_link("?ex=abc"), Err(LinkError::Format));
    }

    #[test]
    fn non_numeric_channel_is_rejected() {
        assert_eq!(parse_link("abc/456/image.png"), Err(LinkError::ChannelId));
    }

    #[test]
    fn negative_channel_is_rejected() {
        assert_eq!(parse_link("-1/456/image.png"), Err(LinkError::ChannelId));
    }

    #[test]
    fn non_numeric_file_is_rejected() {
        assert_eq!(parse_link("123/xyz/image.png"), Err(LinkError::FileId));
    }

    #[test]
    fn overflowing_file_id_is_rejected() {
        assert_eq!(
            parse_link("123/18446744073709551616/image.png"),
            Err(LinkError::FileId)
        );
    }

    #[test]
    fn channel_is_checked_before_file() {
        assert_eq!(parse_link("abc/xyz/noext"), Err(LinkError::ChannelId));
    }

    #[test]
    fn missing_extension_is_rejected() {
        assert_eq!(
            parse_link("123/456/noextension"),
            Err(LinkError::MissingExtension)
        );
    }

    #[test]
    fn error_messages_match_client_facing_text() {
        assert_eq!(LinkError::Format.to_string(), "Invalid link format");
        assert_eq!(LinkError::ChannelId.to_string(), "Invalid Channel ID");
        assert_eq!(LinkError::FileId.to_string(), "Invalid File ID");
        assert_eq!(
            LinkError::MissingExtension.to_string(),
            "File name must include a file extension"
        );
    }

    #[test]
    fn rebuilds_canonical_cdn_url() {
        let link = parse_link("https://media.discordapp.net/attachments/123/456/image.png?ex=abc")
            .unwrap();

        assert_eq!(
            link.cdn_url(),
            "https://cdn.discordapp.com/attachments/123/456/image.png"
        );
    }

    #[test]
    fn custom_cdn_base_drops_trailing_slash() {
        let link = parse_link("123/456/image.png").unwrap();

        assert_eq!(
            link.cdn_url_with_base("http://localhost:9000/"),
            "http://localhost:9000/attachments/123/456/image.png"
        );
    }

    #[test]
    fn serializes_with_wire_field_names() {
        let link = parse_link("123/456/image.png").unwrap();
        let value = serde_json::to_value(&link).unwrap();

        assert_eq!(
            value,
            serde_json::json!({"channelID": 123, "fileID": 456, "fileName": "image.png"})
        );
    }

    #[test]
    fn from_str_delegates_to_parser() {
        let link: AttachmentLink = "1/2/a.txt".parse().unwrap();
        assert_eq!(link.to_string(), "1/2/a.txt");
    }
}
