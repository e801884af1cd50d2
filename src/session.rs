//! Call session value objects shared with the renderer protocol.

use serde::{Deserialize, Serialize};

/// Immutable description of an in-progress call, created when a join request
/// is accepted and discarded when the widget window closes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CallSession {
    #[serde(rename = "callID")]
    pub call_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, rename = "rootID", skip_serializing_if = "Option::is_none")]
    pub root_id: Option<String>,
    #[serde(default, rename = "channelURL", skip_serializing_if = "Option::is_none")]
    pub channel_url: Option<String>,
}

impl CallSession {
    pub fn new(call_id: impl Into<String>) -> Self {
        Self {
            call_id: call_id.into(),
            title: None,
            root_id: None,
            channel_url: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_root_id(mut self, root_id: impl Into<String>) -> Self {
        self.root_id = Some(root_id.into());
        self
    }

    pub fn with_channel_url(mut self, channel_url: impl Into<String>) -> Self {
        self.channel_url = Some(channel_url.into());
        self
    }
}

/// Reply payload for a resolved join request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinConfirmation {
    #[serde(rename = "callID")]
    pub call_id: String,
    #[serde(rename = "sessionID")]
    pub session_id: String,
}
