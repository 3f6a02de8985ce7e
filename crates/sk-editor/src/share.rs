//! Share payload for posting a drawing to a webhook.
//!
//! Turns a captured canvas data URI plus an optional caption and handle
//! into the file and message a webhook expects. Delivery is left to a
//! [`ShareTarget`] supplied by the host; the endpoint always comes from
//! configuration.

use crate::config::ShareConfig;
use base64::{Engine, engine::general_purpose};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShareError {
    #[error("Share webhook URL not configured")]
    NotConfigured,

    #[error("Invalid image data URI: {0}")]
    InvalidDataUri(String),

    #[error("Failed to deliver share: {0}")]
    Delivery(String),
}

/// Everything needed to post one drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharePayload {
    pub endpoint: String,
    pub filename: String,
    /// Image MIME type from the data URI, e.g. `image/png`.
    pub mime_type: String,
    pub image: Vec<u8>,
    pub content: String,
}

/// Host-side delivery (browser `fetch`, an HTTP client, a test double).
pub trait ShareTarget {
    fn deliver(&mut self, payload: &SharePayload) -> Result<(), ShareError>;
}

/// Split `data:image/<subtype>;base64,<payload>` and decode the payload.
pub fn decode_data_uri(data_uri: &str) -> Result<(String, Vec<u8>), ShareError> {
    let invalid = |why: &str| ShareError::InvalidDataUri(why.to_string());

    let rest = data_uri
        .strip_prefix("data:image/")
        .ok_or_else(|| invalid("expected a `data:image/` prefix"))?;
    let (subtype, payload) = rest
        .split_once(";base64,")
        .ok_or_else(|| invalid("expected `;base64,` encoding"))?;
    if subtype.is_empty()
        || !subtype
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
    {
        return Err(invalid("bad image subtype"));
    }
    let image = general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| ShareError::InvalidDataUri(e.to_string()))?;
    Ok((format!("image/{subtype}"), image))
}

/// `<handle>_drawing.png` with the first `@` dropped, or `drawing.png`.
pub fn share_filename(handle: Option<&str>) -> String {
    match handle {
        Some(h) => format!("{}_drawing.png", h.replacen('@', "", 1)),
        None => "drawing.png".to_string(),
    }
}

/// Message text accompanying the image.
pub fn share_content(text: Option<&str>, handle: Option<&str>) -> String {
    match (text, handle) {
        (Some(text), Some(handle)) => format!("By {handle}\n{text}"),
        (Some(text), None) => text.to_string(),
        (None, Some(handle)) => format!("New drawing shared by {handle}!"),
        (None, None) => "New drawing shared!".to_string(),
    }
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

/// Build the payload. Empty caption or handle strings count as absent.
pub fn build_payload(
    config: &ShareConfig,
    data_uri: &str,
    text: &str,
    handle: &str,
) -> Result<SharePayload, ShareError> {
    let endpoint = config
        .webhook_url
        .as_deref()
        .and_then(non_empty)
        .ok_or(ShareError::NotConfigured)?
        .to_string();
    let (mime_type, image) = decode_data_uri(data_uri)?;
    let (text, handle) = (non_empty(text), non_empty(handle));

    Ok(SharePayload {
        endpoint,
        filename: share_filename(handle),
        mime_type,
        image,
        content: share_content(text, handle),
    })
}

/// Build and deliver in one step.
pub fn share(
    target: &mut dyn ShareTarget,
    config: &ShareConfig,
    data_uri: &str,
    text: &str,
    handle: &str,
) -> Result<(), ShareError> {
    let payload = build_payload(config, data_uri, text, handle)?;
    log::debug!(
        "share: delivering {} ({} bytes)",
        payload.filename,
        payload.image.len()
    );
    target.deliver(&payload)
}
