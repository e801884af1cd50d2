//! Screen-capture source negotiation.
//!
//! Sits between the main view's "pick something to share" request and the
//! OS: runs the in-app consent prompt, handles the platform permission
//! pre-check (including the reset-and-settings-page dance on platforms where
//! the native prompt only ever appears once), enumerates sources and reports
//! failures to the renderers as `calls-error` notifications rather than
//! exceptions.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::bus::{CallsErrorPayload, MessageBus, SenderId, channels};
use crate::platform::{Capability, CaptureBackend, ConsentBroker, ScreenPermission, ViewInfo};

/// Which source classes the renderer wants enumerated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    Screen,
    Window,
}

/// Enumeration options, decoded from the renderer's request payload.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SourceOptions {
    #[serde(default)]
    pub types: Vec<SourceKind>,
}

/// Wire shape of a single capture source offered to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceEntry {
    pub id: String,
    pub name: String,
    #[serde(rename = "thumbnailURL")]
    pub thumbnail_url: String,
}

/// Orchestrates permission checks and source enumeration for screen sharing.
///
/// Owns the tri-state denial memory: `None` until a permission check has run,
/// then whether an OS-level denial has been observed. A second denial opens
/// the OS privacy settings instead of re-prompting, since the native prompt
/// will not reappear.
#[derive(Debug, Default)]
pub struct ScreenShareNegotiator {
    missing_permissions: Option<bool>,
}

impl ScreenShareNegotiator {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    pub(crate) fn missing_permissions(&self) -> Option<bool> {
        self.missing_permissions
    }

    /// Runs the full negotiation for a request issued by `view` on behalf of
    /// the call `call_id`. Returns the offered sources; every failure path
    /// degrades to an empty list after notifying the view and the widget
    /// with a `calls-error` message.
    pub fn desktop_sources<C, K, B>(
        &mut self,
        backend: &mut C,
        consent: &mut K,
        bus: &mut B,
        view: &ViewInfo,
        call_id: &str,
        widget: Option<SenderId>,
        options: &SourceOptions,
    ) -> Vec<SourceEntry>
    where
        C: CaptureBackend,
        K: ConsentBroker,
        B: MessageBus,
    {
        self.precheck_os_permission(backend);

        if !consent.request(Capability::ScreenShare, &view.view_url, false) {
            tracing::debug!(call_id, "screen-share consent refused");
            notify_screen_permissions_error(bus, view.sender, widget, call_id);
            return Vec::new();
        }

        let sources = match backend.capture_sources(options) {
            Ok(sources) => sources,
            Err(err) => {
                tracing::error!(call_id, %err, "capture source enumeration failed");
                notify_screen_permissions_error(bus, view.sender, widget, call_id);
                return Vec::new();
            }
        };

        // The OS can deny silently: enumeration "succeeds" but permission is
        // gone or the list is empty. Treat both as a permission failure.
        if backend.screen_permission() == ScreenPermission::Denied {
            self.missing_permissions = Some(true);
            tracing::warn!(call_id, "screen recording permission denied after enumeration");
            notify_screen_permissions_error(bus, view.sender, widget, call_id);
            return Vec::new();
        }
        if sources.is_empty() {
            tracing::warn!(call_id, "no capture sources available");
            notify_screen_permissions_error(bus, view.sender, widget, call_id);
            return Vec::new();
        }

        self.missing_permissions = Some(false);
        sources
            .into_iter()
            .map(|source| SourceEntry {
                id: source.id,
                name: source.name,
                thumbnail_url: source.thumbnail_data_url,
            })
            .collect()
    }

    /// Platform-conditional pre-check: on capture-gated platforms with a
    /// denied permission, reset the permission state so the native prompt can
    /// show, and on a repeat denial open the privacy settings page instead.
    /// Failures here are logged and never abort the flow.
    fn precheck_os_permission<C: CaptureBackend>(&mut self, backend: &mut C) {
        if !backend.gates_screen_capture() {
            return;
        }
        if backend.screen_permission() != ScreenPermission::Denied {
            return;
        }
        let seen_before = self.missing_permissions == Some(true);
        if let Err(err) = backend.reset_screen_permission() {
            tracing::warn!(%err, "failed to reset screen recording permission");
        }
        if seen_before
            && let Err(err) = backend.open_screen_privacy_settings()
        {
            tracing::warn!(%err, "failed to open screen recording settings");
        }
        self.missing_permissions = Some(true);
    }
}

fn notify_screen_permissions_error<B: MessageBus>(
    bus: &mut B,
    view: SenderId,
    widget: Option<SenderId>,
    call_id: &str,
) {
    let payload: Value = serde_json::to_value(CallsErrorPayload::screen_permissions(call_id))
        .unwrap_or(Value::Null);
    bus.send(view, channels::CALLS_ERROR, payload.clone());
    if let Some(widget) = widget {
        bus.send(widget, channels::CALLS_ERROR, payload);
    }
}
