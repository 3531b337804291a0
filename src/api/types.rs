// API types module
// Request payload and reply shapes exchanged with the editor

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// RFC 3339 UTC timestamp with millisecond precision
pub fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fields the editor may send with a POST; unknown fields are ignored
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ActionRequest {
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub folder: Option<String>,
    #[serde(default)]
    pub start_template_url: Option<String>,
    #[serde(default)]
    pub old_name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

/// Query-string parameters the dispatcher looks at
#[derive(Debug, Default, PartialEq, Eq)]
pub struct QueryParams {
    pub action: Option<String>,
    pub url: Option<String>,
}

/// Successful action reply; serialized without a variant tag
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum Reply {
    Saved(SaveReply),
    NewPage(NewPageReply),
    Reusable(ReusableReply),
    Status(StatusReply),
    Message(MessageReply),
    /// Upstream JSON relayed verbatim
    Relay(serde_json::Value),
}

#[derive(Debug, Serialize)]
pub struct SaveReply {
    pub success: bool,
    pub message: String,
    pub data: SavedFile,
}

/// Descriptor of a save that was accepted but not written anywhere
#[derive(Debug, Serialize)]
pub struct SavedFile {
    pub file: String,
    pub timestamp: String,
    /// Byte length of the submitted HTML
    pub size: usize,
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct NewPageReply {
    pub success: bool,
    pub message: String,
    pub template: &'static str,
    pub data: PageMeta,
}

#[derive(Debug, Serialize)]
pub struct PageMeta {
    pub title: String,
    pub file: String,
    pub folder: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReusableReply {
    pub success: bool,
    pub message: String,
    pub component_id: String,
}

/// Health and test replies
#[derive(Debug, Serialize)]
pub struct StatusReply {
    pub success: bool,
    pub message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct MessageReply {
    pub success: bool,
    pub message: String,
}

impl MessageReply {
    pub fn ok(message: String) -> Self {
        Self {
            success: true,
            message,
        }
    }
}

impl StatusReply {
    pub fn ok(message: &str) -> Self {
        Self {
            success: true,
            message: message.to_string(),
            timestamp: timestamp(),
        }
    }
}
