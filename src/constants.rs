//! Shared crate-wide constants.

/// Plugin id of the calls plugin served by the server. The widget and
/// pop-out pages both live under this plugin's static route.
pub const CALLS_PLUGIN_ID: &str = "com.desktop.calls";

/// Minimum (and initial) widget window width in logical pixels.
///
/// The widget window is created non-resizable at this size; renderer-driven
/// resize requests may grow it but never shrink it below this value.
pub const MIN_WIDGET_WIDTH: i32 = 280;

/// Minimum (and initial) widget window height in logical pixels.
pub const MIN_WIDGET_HEIGHT: i32 = 86;

/// Offset, in logical pixels, between the widget window and the bottom-left
/// corner of the main application window it is anchored to.
///
/// Applies to both axes: the widget sits this many pixels right of the main
/// window's left edge and the same distance above its bottom edge.
pub const WIDGET_EDGE_MARGIN: i32 = 12;

/// Server-relative page path (under the calls plugin root) of the widget.
pub const WIDGET_PAGE: &str = "standalone/widget.html";

/// Server-relative path segment (under the calls plugin root) of the pop-out
/// page. The active call id is appended as a trailing segment.
pub const POPOUT_PAGE: &str = "expanded";

/// Product token identifying the desktop shell to server-side code. The
/// widget is loaded with a user agent carrying this token, and the pop-out is
/// reloaded with it after its first load.
pub const USER_AGENT_PRODUCT: &str = "DesktopShell";

/// Environment variable that, when set to a non-empty value, auto-opens
/// developer tools on the widget window as soon as it is shown.
pub const DEVTOOLS_ENV_VAR: &str = "CALL_WIDGET_DEVTOOLS";

/// User-agent string the widget and pop-out windows are loaded with.
pub fn desktop_user_agent() -> String {
    format!("{}/{}", USER_AGENT_PRODUCT, env!("CARGO_PKG_VERSION"))
}
