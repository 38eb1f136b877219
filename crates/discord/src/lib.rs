//! Discord attachment primitives for relink.
//!
//! [`parse_link`] turns an expired CDN URL into an [`AttachmentLink`], and an
//! [`AttachmentRefresher`] exchanges the canonical URL of that link for a freshly
//! signed one.

pub mod link;
pub mod refresh;

pub use link::{parse_link, AttachmentLink, LinkError, DEFAULT_CDN_BASE_URL};
pub use refresh::{
    AttachmentRefresher, DiscordRefreshClient, RefreshError, RefreshUrlsResponse, RefreshedUrl,
    DEFAULT_API_BASE_URL,
};
