//! Message-bus protocol: channel names, sender identities and the outbound
//! bus seam.
//!
//! The transport itself is external. The host's bus adapter decodes raw
//! channel traffic into [`WidgetMessage`] values (carrying the opaque sender
//! identity of the originating rendering context) and hands them to the
//! controller; outbound traffic flows through the [`MessageBus`] trait.

use serde::Serialize;
use serde_json::Value;

/// Opaque identity of a rendering context, assigned by the host window
/// system. Every inbound message carries one; the controller validates it
/// against its own window set before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SenderId(pub u64);

/// Handle for completing a request/response call. Minted by the bus adapter
/// when a request arrives; passing it to [`MessageBus::respond`] delivers the
/// reply. Dropping it leaves the request pending forever.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResponseToken(pub u64);

/// Outbound channel names.
pub mod channels {
    /// Relays the selected capture source from the main view to the widget.
    pub const CALLS_WIDGET_SHARE_SCREEN: &str = "calls-widget-share-screen";
    /// Error notification `{kind, callID}` sent to view and widget.
    pub const CALLS_ERROR: &str = "calls-error";
    /// In-app history navigation in the main view.
    pub const BROWSER_HISTORY_PUSH: &str = "browser-history-push";
    /// Asks the app layer to rebuild its shortcut menu (no payload).
    pub const UPDATE_SHORTCUT_MENU: &str = "update-shortcut-menu";
    /// Forward of a widget open-thread request to the main view.
    pub const CALLS_OPEN_THREAD: &str = "calls-open-thread";
    /// Forward of a widget stop-recording-modal request to the main view.
    pub const CALLS_OPEN_STOP_RECORDING_MODAL: &str = "calls-open-stop-recording-modal";
}

/// Pass-through channels the widget may forward verbatim to the main view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayChannel {
    Error,
    JoinRequest,
    DeepLinkModal,
}

impl RelayChannel {
    pub fn name(self) -> &'static str {
        match self {
            RelayChannel::Error => "calls-error",
            RelayChannel::JoinRequest => "calls-join-request",
            RelayChannel::DeepLinkModal => "calls-deep-link-modal",
        }
    }
}

/// Inbound fire-and-forget control messages, decoded by the bus adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetMessage {
    /// Widget asks to grow/shrink its own window.
    Resize { width: i32, height: i32 },
    /// Main view relays the capture source the user picked.
    ShareScreen { source_id: String, with_audio: bool },
    /// Bring the pop-out window to the foreground.
    PopoutFocus,
    /// User left the call from the widget UI.
    LeaveCall,
    /// Link activated inside the widget; absolute URLs route as deep links,
    /// relative paths as in-app history navigation.
    LinkClick { url: String },
    /// Open the call's thread in the main view.
    OpenThread { thread_id: String },
    /// Open the stop-recording confirmation in the main view.
    OpenStopRecordingModal { channel_id: String },
    /// Deprecated link-click variant: ignores any argument and navigates the
    /// main view to the stored channel URL. Retained for older senders.
    DeprecatedLinkClick,
    /// Generic pass-through forward to the main view.
    Relay {
        channel: RelayChannel,
        payload: Value,
    },
    /// The widget's rendering context acknowledges the join.
    CallJoined {
        call_id: String,
        session_id: String,
    },
}

/// Payload of a [`channels::CALLS_ERROR`] notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallsErrorPayload {
    pub kind: &'static str,
    #[serde(rename = "callID")]
    pub call_id: String,
}

impl CallsErrorPayload {
    /// Screen-capture permission was refused at the OS or consent level, or
    /// enumeration produced nothing shareable.
    pub fn screen_permissions(call_id: impl Into<String>) -> Self {
        Self {
            kind: "screen-permissions",
            call_id: call_id.into(),
        }
    }
}

/// Outbound half of the message bus.
///
/// Implementations are expected to be fire-and-forget: delivery failures are
/// the transport's concern, not the controller's.
pub trait MessageBus {
    /// Sends a payload to a specific rendering context.
    fn send(&mut self, target: SenderId, channel: &'static str, payload: Value);

    /// Completes a pending request/response call.
    fn respond(&mut self, token: ResponseToken, payload: Value);

    /// App-level notification with no addressee and no payload.
    fn broadcast(&mut self, channel: &'static str);
}
