//! Trait seams toward the host window system and its capability brokers.
//!
//! The controller never talks to the OS directly. Window creation,
//! main-window geometry and focus, screen-recording permission state,
//! capture-source enumeration, in-app consent prompts, context menus and
//! view resolution all arrive through the traits in this module.
//! Integration tests drive the controller through in-memory implementations
//! of the same seams.

use thiserror::Error;
use url::Url;

use crate::bus::SenderId;
use crate::geometry::Bounds;

pub type PlatformResult<T> = Result<T, PlatformError>;

/// Failure reported by the host window system. Carried for logging; the
/// controller degrades gracefully on most platform failures.
#[derive(Debug, Error)]
#[error("{context}: {message}")]
pub struct PlatformError {
    context: &'static str,
    message: String,
}

impl PlatformError {
    pub fn new(context: &'static str, message: impl Into<String>) -> Self {
        Self {
            context,
            message: message.into(),
        }
    }
}

/// Creation options for the widget window. The controller always asks for a
/// borderless, transparent, always-on-top, non-resizable window that stays
/// hidden until the first paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetWindowOptions {
    pub bounds: Bounds,
    pub frameless: bool,
    pub transparent: bool,
    pub always_on_top: bool,
    pub resizable: bool,
    pub show: bool,
}

impl WidgetWindowOptions {
    pub fn overlay(bounds: Bounds) -> Self {
        Self {
            bounds,
            frameless: true,
            transparent: true,
            always_on_top: true,
            resizable: false,
            show: false,
        }
    }
}

/// Lifecycle notifications the host forwards to the controller for windows
/// the controller owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowEvent {
    /// First successful paint; the window may be shown.
    ReadyToShow,
    /// The window finished loading its first frame. Only meaningful for the
    /// pop-out, which is reloaded with the desktop user agent at this point.
    FinishedLoad,
    /// The window has been destroyed and all dependent state is invalid.
    Closed,
}

/// An OS window owned by the controller (the widget or the pop-out).
pub trait OverlayWindow {
    /// Identity of the window's rendering context on the message bus.
    fn sender_id(&self) -> SenderId;

    fn load_url(&mut self, url: &Url, user_agent: &str) -> PlatformResult<()>;

    /// Reloads the current document with a different user agent. Used for the
    /// pop-out, whose user agent cannot be set at window-open time.
    fn reload_with_user_agent(&mut self, user_agent: &str) -> PlatformResult<()>;

    fn bounds(&self) -> Bounds;
    fn set_bounds(&mut self, bounds: Bounds);

    fn show(&mut self);
    fn focus(&mut self);

    /// Requests asynchronous destruction; [`WindowEvent::Closed`] follows.
    fn destroy(&mut self);
    fn is_destroyed(&self) -> bool;

    /// Pins the window above screen-saver-level windows.
    fn pin_above_screensaver(&mut self);
    /// Makes the window visible on all workspaces, fullscreen ones included.
    fn show_on_all_workspaces(&mut self);
    fn set_menu_bar_visible(&mut self, visible: bool);
    fn open_devtools(&mut self);
}

/// Handle to a context menu attached to a window. Disposed when the owning
/// window goes away.
pub trait ContextMenu {
    fn dispose(&mut self);
}

/// OS screen-recording permission state, as far as it can be observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenPermission {
    Allowed,
    Denied,
    /// The OS has not been asked yet, or does not gate screen capture.
    Unknown,
}

/// Capture-source description returned by the OS enumeration. Thumbnails
/// arrive already encoded as `data:` image URLs; encoding is the host's
/// concern since the image handle never leaves the platform layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawCaptureSource {
    pub id: String,
    pub name: String,
    pub thumbnail_data_url: String,
}

/// OS-level screen-capture facilities.
pub trait CaptureBackend {
    /// Whether this platform gates screen capture behind a recording
    /// permission that needs the pre-check dance (reset + settings page).
    fn gates_screen_capture(&self) -> bool;

    fn screen_permission(&self) -> ScreenPermission;

    /// Resets a denied permission so the native prompt can appear again.
    fn reset_screen_permission(&mut self) -> PlatformResult<()>;

    /// Opens the OS privacy-settings page for screen recording.
    fn open_screen_privacy_settings(&mut self) -> PlatformResult<()>;

    fn capture_sources(
        &mut self,
        options: &crate::capture::SourceOptions,
    ) -> PlatformResult<Vec<RawCaptureSource>>;
}

/// The host desktop shell: window factory plus main-window access.
pub trait Shell: CaptureBackend {
    type Window: OverlayWindow;
    type Menu: ContextMenu;

    fn create_widget_window(
        &mut self,
        options: &WidgetWindowOptions,
    ) -> PlatformResult<Self::Window>;

    fn main_window_bounds(&self) -> Bounds;
    fn focus_main_window(&mut self);

    /// Attaches the application's shared context menu to a window.
    fn attach_context_menu(&mut self, window: &mut Self::Window) -> Self::Menu;
}

/// Sensitive capabilities subject to explicit in-app consent, independent of
/// OS-level permission state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    ScreenShare,
}

/// In-app consent prompt seam.
pub trait ConsentBroker {
    /// Asks for consent to use `capability` on behalf of the document at
    /// `url`. `main_frame` is false for requests raised by subframes.
    fn request(&mut self, capability: Capability, url: &Url, main_frame: bool) -> bool;
}

/// A logical server/tab view resolved from a sender identity.
#[derive(Debug, Clone)]
pub struct ViewInfo {
    pub sender: SenderId,
    pub server_id: String,
    pub server_base: Url,
    /// URL of the document currently loaded in the view; consent prompts are
    /// scoped to it.
    pub view_url: Url,
}

/// The view/tab manager. The controller holds sender ids, never view
/// ownership, and resolves them here on every use.
pub trait ViewRegistry {
    fn view_for_sender(&self, sender: SenderId) -> Option<ViewInfo>;

    /// Switches the active server to the one hosting the call.
    fn switch_server(&mut self, server_id: &str);

    /// Routes an absolute URL through the deep-link subsystem.
    fn route_deep_link(&mut self, url: Url);
}
