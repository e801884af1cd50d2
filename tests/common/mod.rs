//! In-memory fakes for the platform, view-manager, consent and bus seams.
//!
//! Handles are `Clone` with shared interiors so tests can keep inspecting
//! them after moving them into the controller.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use serde_json::Value;
use url::Url;

use call_widget::bus::{MessageBus, ResponseToken, SenderId};
use call_widget::capture::SourceOptions;
use call_widget::geometry::{Bounds, BoundsDelta};
use call_widget::platform::{
    Capability, CaptureBackend, ConsentBroker, ContextMenu, OverlayWindow, PlatformError,
    PlatformResult, RawCaptureSource, ScreenPermission, Shell, ViewInfo, ViewRegistry,
    WidgetWindowOptions,
};

#[derive(Debug)]
pub struct WindowState {
    pub sender: SenderId,
    pub bounds: Bounds,
    pub drift: BoundsDelta,
    pub options: Option<WidgetWindowOptions>,
    pub loads: Vec<(String, String)>,
    pub reloads: Vec<String>,
    pub shown: bool,
    pub focus_count: usize,
    pub destroy_requested: bool,
    pub destroyed: bool,
    pub pinned_above_screensaver: bool,
    pub on_all_workspaces: bool,
    pub menu_bar_visible: Option<bool>,
    pub devtools_opened: bool,
}

impl Default for WindowState {
    fn default() -> Self {
        Self {
            sender: SenderId(0),
            bounds: Bounds::default(),
            drift: BoundsDelta::default(),
            options: None,
            loads: Vec::new(),
            reloads: Vec::new(),
            shown: false,
            focus_count: 0,
            destroy_requested: false,
            destroyed: false,
            pinned_above_screensaver: false,
            on_all_workspaces: false,
            menu_bar_visible: None,
            devtools_opened: false,
        }
    }
}

pub struct FakeWindow {
    state: Rc<RefCell<WindowState>>,
}

impl FakeWindow {
    pub fn state(&self) -> Rc<RefCell<WindowState>> {
        Rc::clone(&self.state)
    }
}

impl OverlayWindow for FakeWindow {
    fn sender_id(&self) -> SenderId {
        self.state.borrow().sender
    }

    fn load_url(&mut self, url: &Url, user_agent: &str) -> PlatformResult<()> {
        self.state
            .borrow_mut()
            .loads
            .push((url.to_string(), user_agent.to_string()));
        Ok(())
    }

    fn reload_with_user_agent(&mut self, user_agent: &str) -> PlatformResult<()> {
        self.state.borrow_mut().reloads.push(user_agent.to_string());
        Ok(())
    }

    fn bounds(&self) -> Bounds {
        self.state.borrow().bounds
    }

    fn set_bounds(&mut self, bounds: Bounds) {
        let mut state = self.state.borrow_mut();
        let drift = state.drift;
        state.bounds = bounds.shifted_by(drift);
    }

    fn show(&mut self) {
        self.state.borrow_mut().shown = true;
    }

    fn focus(&mut self) {
        self.state.borrow_mut().focus_count += 1;
    }

    fn destroy(&mut self) {
        self.state.borrow_mut().destroy_requested = true;
    }

    fn is_destroyed(&self) -> bool {
        self.state.borrow().destroyed
    }

    fn pin_above_screensaver(&mut self) {
        self.state.borrow_mut().pinned_above_screensaver = true;
    }

    fn show_on_all_workspaces(&mut self) {
        self.state.borrow_mut().on_all_workspaces = true;
    }

    fn set_menu_bar_visible(&mut self, visible: bool) {
        self.state.borrow_mut().menu_bar_visible = Some(visible);
    }

    fn open_devtools(&mut self) {
        self.state.borrow_mut().devtools_opened = true;
    }
}

pub struct FakeMenu {
    disposed: Rc<RefCell<bool>>,
}

impl ContextMenu for FakeMenu {
    fn dispose(&mut self) {
        *self.disposed.borrow_mut() = true;
    }
}

pub struct ShellInner {
    next_sender: u64,
    pub drift: BoundsDelta,
    pub main_bounds: Bounds,
    pub focus_main_count: usize,
    pub windows: Vec<Rc<RefCell<WindowState>>>,
    pub menus: Vec<Rc<RefCell<bool>>>,
    pub fail_create: bool,
    pub gated: bool,
    pub permission: ScreenPermission,
    pub resets: usize,
    pub settings_opened: usize,
    pub sources: Vec<RawCaptureSource>,
    pub fail_enumeration: bool,
    pub enumerations: usize,
}

#[derive(Clone)]
pub struct FakeShell {
    inner: Rc<RefCell<ShellInner>>,
}

impl Default for ShellInner {
    fn default() -> Self {
        Self {
            next_sender: 100,
            drift: BoundsDelta::default(),
            main_bounds: Bounds::new(0, 0, 1200, 800),
            focus_main_count: 0,
            windows: Vec::new(),
            menus: Vec::new(),
            fail_create: false,
            gated: false,
            permission: ScreenPermission::Unknown,
            resets: 0,
            settings_opened: 0,
            sources: Vec::new(),
            fail_enumeration: false,
            enumerations: 0,
        }
    }
}

impl FakeShell {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(RefCell::new(ShellInner::default())),
        }
    }

    pub fn inner(&self) -> std::cell::Ref<'_, ShellInner> {
        self.inner.borrow()
    }

    pub fn inner_mut(&self) -> std::cell::RefMut<'_, ShellInner> {
        self.inner.borrow_mut()
    }

    pub fn windows_created(&self) -> usize {
        self.inner.borrow().windows.len()
    }

    pub fn window(&self, index: usize) -> Rc<RefCell<WindowState>> {
        Rc::clone(&self.inner.borrow().windows[index])
    }

    pub fn menu_disposed(&self, index: usize) -> bool {
        *self.inner.borrow().menus[index].borrow()
    }

    fn make_window(&self, options: Option<WidgetWindowOptions>) -> FakeWindow {
        let mut inner = self.inner.borrow_mut();
        let sender = SenderId(inner.next_sender);
        inner.next_sender += 1;
        let bounds = options
            .map(|opts| opts.bounds.shifted_by(inner.drift))
            .unwrap_or_default();
        let state = Rc::new(RefCell::new(WindowState {
            sender,
            bounds,
            drift: inner.drift,
            options,
            ..Default::default()
        }));
        inner.windows.push(Rc::clone(&state));
        FakeWindow { state }
    }

    /// Creates a window the way the platform would for an allowed pop-out
    /// open; hand the result to `WidgetController::adopt_popout`.
    pub fn new_popout_window(&self) -> FakeWindow {
        self.make_window(None)
    }
}

impl CaptureBackend for FakeShell {
    fn gates_screen_capture(&self) -> bool {
        self.inner.borrow().gated
    }

    fn screen_permission(&self) -> ScreenPermission {
        self.inner.borrow().permission
    }

    fn reset_screen_permission(&mut self) -> PlatformResult<()> {
        self.inner.borrow_mut().resets += 1;
        Ok(())
    }

    fn open_screen_privacy_settings(&mut self) -> PlatformResult<()> {
        self.inner.borrow_mut().settings_opened += 1;
        Ok(())
    }

    fn capture_sources(
        &mut self,
        _options: &SourceOptions,
    ) -> PlatformResult<Vec<RawCaptureSource>> {
        let mut inner = self.inner.borrow_mut();
        inner.enumerations += 1;
        if inner.fail_enumeration {
            return Err(PlatformError::new("capture_sources", "enumeration failed"));
        }
        Ok(inner.sources.clone())
    }
}

impl Shell for FakeShell {
    type Window = FakeWindow;
    type Menu = FakeMenu;

    fn create_widget_window(
        &mut self,
        options: &WidgetWindowOptions,
    ) -> PlatformResult<Self::Window> {
        if self.inner.borrow().fail_create {
            return Err(PlatformError::new("create_widget_window", "creation failed"));
        }
        Ok(self.make_window(Some(*options)))
    }

    fn main_window_bounds(&self) -> Bounds {
        self.inner.borrow().main_bounds
    }

    fn focus_main_window(&mut self) {
        self.inner.borrow_mut().focus_main_count += 1;
    }

    fn attach_context_menu(&mut self, _window: &mut Self::Window) -> Self::Menu {
        let disposed = Rc::new(RefCell::new(false));
        self.inner.borrow_mut().menus.push(Rc::clone(&disposed));
        FakeMenu { disposed }
    }
}

#[derive(Default)]
pub struct ViewsInner {
    pub views: Vec<ViewInfo>,
    pub switched: Vec<String>,
    pub deep_links: Vec<Url>,
}

#[derive(Clone, Default)]
pub struct FakeViews {
    inner: Rc<RefCell<ViewsInner>>,
}

impl FakeViews {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_view(&self, sender: SenderId, server_id: &str, server_base: &str, view_url: &str) {
        self.inner.borrow_mut().views.push(ViewInfo {
            sender,
            server_id: server_id.to_string(),
            server_base: Url::parse(server_base).unwrap(),
            view_url: Url::parse(view_url).unwrap(),
        });
    }

    pub fn remove_view(&self, sender: SenderId) {
        self.inner.borrow_mut().views.retain(|view| view.sender != sender);
    }

    pub fn switched(&self) -> Vec<String> {
        self.inner.borrow().switched.clone()
    }

    pub fn deep_links(&self) -> Vec<Url> {
        self.inner.borrow().deep_links.clone()
    }
}

impl ViewRegistry for FakeViews {
    fn view_for_sender(&self, sender: SenderId) -> Option<ViewInfo> {
        self.inner
            .borrow()
            .views
            .iter()
            .find(|view| view.sender == sender)
            .cloned()
    }

    fn switch_server(&mut self, server_id: &str) {
        self.inner.borrow_mut().switched.push(server_id.to_string());
    }

    fn route_deep_link(&mut self, url: Url) {
        self.inner.borrow_mut().deep_links.push(url);
    }
}

#[derive(Clone)]
pub struct FakeConsent {
    inner: Rc<RefCell<(bool, usize)>>,
}

impl FakeConsent {
    pub fn granting(grant: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new((grant, 0))),
        }
    }

    pub fn requests(&self) -> usize {
        self.inner.borrow().1
    }
}

impl ConsentBroker for FakeConsent {
    fn request(&mut self, _capability: Capability, _url: &Url, main_frame: bool) -> bool {
        assert!(!main_frame, "widget consent requests are never main-frame");
        let mut inner = self.inner.borrow_mut();
        inner.1 += 1;
        inner.0
    }
}

#[derive(Default)]
pub struct BusInner {
    pub sent: Vec<(SenderId, &'static str, Value)>,
    pub responses: Vec<(ResponseToken, Value)>,
    pub broadcasts: Vec<&'static str>,
}

#[derive(Clone, Default)]
pub struct FakeBus {
    inner: Rc<RefCell<BusInner>>,
}

impl FakeBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(SenderId, &'static str, Value)> {
        self.inner.borrow().sent.clone()
    }

    pub fn responses(&self) -> Vec<(ResponseToken, Value)> {
        self.inner.borrow().responses.clone()
    }

    pub fn broadcasts(&self) -> Vec<&'static str> {
        self.inner.borrow().broadcasts.clone()
    }
}

impl MessageBus for FakeBus {
    fn send(&mut self, target: SenderId, channel: &'static str, payload: Value) {
        self.inner.borrow_mut().sent.push((target, channel, payload));
    }

    fn respond(&mut self, token: ResponseToken, payload: Value) {
        self.inner.borrow_mut().responses.push((token, payload));
    }

    fn broadcast(&mut self, channel: &'static str) {
        self.inner.borrow_mut().broadcasts.push(channel);
    }
}

use call_widget::controller::{ControllerOptions, WidgetController};
use call_widget::platform::WindowEvent;
use call_widget::session::CallSession;

/// Sender id of the pre-registered main view.
pub const MAIN_VIEW: SenderId = SenderId(1);
pub const SERVER_ID: &str = "srv-1";
pub const SERVER_BASE: &str = "https://chat.example.com";

pub struct Harness {
    pub controller: WidgetController<FakeShell, FakeViews, FakeConsent, FakeBus>,
    pub shell: FakeShell,
    pub views: FakeViews,
    pub consent: FakeConsent,
    pub bus: FakeBus,
}

pub fn harness() -> Harness {
    harness_with(true, ControllerOptions::default())
}

pub fn harness_with_consent(grant: bool) -> Harness {
    harness_with(grant, ControllerOptions::default())
}

pub fn harness_with_options(options: ControllerOptions) -> Harness {
    harness_with(true, options)
}

fn harness_with(grant: bool, options: ControllerOptions) -> Harness {
    let shell = FakeShell::new();
    let views = FakeViews::new();
    views.add_view(
        MAIN_VIEW,
        SERVER_ID,
        SERVER_BASE,
        &format!("{SERVER_BASE}/team/town-square"),
    );
    let consent = FakeConsent::granting(grant);
    let bus = FakeBus::new();
    let controller = WidgetController::new(
        shell.clone(),
        views.clone(),
        consent.clone(),
        bus.clone(),
        options,
    );
    Harness {
        controller,
        shell,
        views,
        consent,
        bus,
    }
}

impl Harness {
    /// Joins `call_id` from the main view and drives the widget through
    /// ready-to-show and the joined ack, leaving the controller in `Open`.
    pub fn open_call(&mut self, call_id: &str, token: ResponseToken) -> SenderId {
        self.controller
            .join_call(MAIN_VIEW, CallSession::new(call_id), token);
        let widget = self.controller.widget_sender().expect("widget window");
        self.controller
            .handle_window_event(widget, WindowEvent::ReadyToShow);
        self.controller.handle_message(
            widget,
            call_widget::bus::WidgetMessage::CallJoined {
                call_id: call_id.to_string(),
                session_id: format!("session-{call_id}"),
            },
        );
        widget
    }

    /// Canonical pop-out URL for the active call on the test server.
    pub fn popout_url(&self, call_id: &str) -> String {
        format!("{SERVER_BASE}/plugins/com.desktop.calls/expanded/{call_id}")
    }
}
