//! Messages from the Ready Player Me avatar-creator frame.
//!
//! The creator posts JSON strings to its host window. Anything can arrive on
//! that channel, so parsing is defensive: callers that only care about
//! well-formed creator events use [`AvatarEvent::from_message`], which logs
//! and drops everything else.

use serde::Deserialize;
use thiserror::Error;

/// `source` value the creator stamps on its own messages.
pub const CREATOR_SOURCE: &str = "readyplayerme";

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message is not json: {0}")]
    NotJson(#[from] serde_json::Error),
    #[error("message from foreign source {0:?}")]
    ForeignSource(Option<String>),
    #[error("event '{0}' is missing data.url")]
    MissingUrl(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AvatarEvent {
    /// The user finished and exported an avatar model.
    Exported { url: String },
    /// The creator frame finished loading.
    FrameReady,
    /// Creator event this host does not act on.
    Other(String),
}

#[derive(Deserialize)]
struct RawMessage {
    #[serde(default)]
    source: Option<String>,
    #[serde(rename = "eventName", default)]
    event_name: String,
    #[serde(default)]
    data: Option<RawData>,
}

#[derive(Deserialize)]
struct RawData {
    #[serde(default)]
    url: Option<String>,
}

/// Strict parse of one posted message.
pub fn parse_message(raw: &str) -> Result<AvatarEvent, MessageError> {
    let RawMessage {
        source,
        event_name,
        data,
    } = serde_json::from_str(raw)?;
    if source.as_deref() != Some(CREATOR_SOURCE) {
        return Err(MessageError::ForeignSource(source));
    }
    match event_name.as_str() {
        "v1.avatar.exported" => data
            .and_then(|d| d.url)
            .map(|url| AvatarEvent::Exported { url })
            .ok_or_else(|| MessageError::MissingUrl(event_name.clone())),
        "v1.frame.ready" => Ok(AvatarEvent::FrameReady),
        _ => Ok(AvatarEvent::Other(event_name.clone())),
    }
}

impl AvatarEvent {
    /// Lenient parse: any failure means "ignore this message".
    pub fn from_message(raw: &str) -> Option<Self> {
        match parse_message(raw) {
            Ok(event) => {
                if let AvatarEvent::Exported { url } = &event {
                    log::info!("avatar exported: {url}");
                }
                Some(event)
            }
            Err(err) => {
                log::debug!("ignoring avatar frame message: {err}");
                None
            }
        }
    }
}

/// URL of the creator frame for a partner subdomain.
pub fn creator_url(subdomain: &str) -> String {
    format!("https://{subdomain}.readyplayer.me/avatar?frameApi")
}
