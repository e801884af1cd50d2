//! The call widget window controller.
//!
//! Owns the always-on-top widget window and its optional pop-out, drives the
//! `Closed → Opening → Open → Draining → Closed` lifecycle, and mediates
//! every message-bus channel touching those windows. All entry points are
//! called from the host's single event-loop thread; mutual exclusion over the
//! window slot is the lifecycle state itself, so a call switch always waits
//! for the previous window's `Closed` event before constructing the next
//! window.

use serde_json::{Value, json};
use url::Url;

use crate::bus::{MessageBus, ResponseToken, SenderId, WidgetMessage, channels};
use crate::capture::{ScreenShareNegotiator, SourceEntry, SourceOptions};
use crate::constants::{DEVTOOLS_ENV_VAR, desktop_user_agent};
use crate::geometry::{
    Bounds, BoundsDelta, anchored_widget_bounds, placement_error, resized_keeping_bottom,
};
use crate::platform::{
    ConsentBroker, ContextMenu, OverlayWindow, Shell, ViewInfo, ViewRegistry, WidgetWindowOptions,
    WindowEvent,
};
use crate::policy;
use crate::session::{CallSession, JoinConfirmation};

/// Host-supplied configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct ControllerOptions {
    /// Auto-open developer tools on the widget window when it is shown.
    pub open_devtools: bool,
}

impl ControllerOptions {
    /// Reads the devtools flag from [`DEVTOOLS_ENV_VAR`].
    pub fn from_env() -> Self {
        let open_devtools = std::env::var(DEVTOOLS_ENV_VAR)
            .map(|value| !value.is_empty())
            .unwrap_or(false);
        Self { open_devtools }
    }
}

/// Coarse lifecycle stage, exposed for the host and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleStage {
    Closed,
    Opening,
    Open,
    OpenWithPopout,
    Draining,
}

/// Verdict for a renderer-initiated window-open attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PopoutDecision {
    Allow { auto_hide_menu_bar: bool },
    Deny,
}

/// Weak handle to the main view that initiated the call: ids only, resolved
/// against the [`ViewRegistry`] on every use.
#[derive(Debug, Clone)]
struct ViewRef {
    sender: SenderId,
    server_id: String,
    server_base: Url,
}

struct Popout<W, M> {
    window: W,
    menu: M,
    /// The one-shot user-agent reload has already run.
    reloaded: bool,
}

struct Active<W, M> {
    window: W,
    session: CallSession,
    canonical_url: Url,
    main_view: ViewRef,
    /// Set once the widget's rendering context acks the join.
    session_id: Option<String>,
    /// Join requests waiting on the ack.
    pending_joins: Vec<ResponseToken>,
    popout: Option<Popout<W, M>>,
}

struct PendingJoin {
    view: ViewInfo,
    session: CallSession,
    tokens: Vec<ResponseToken>,
}

enum Lifecycle<W, M> {
    Closed,
    /// Window constructed and loading; not yet painted.
    Opening(Active<W, M>),
    Open(Active<W, M>),
    /// Destruction requested; waiting for the platform's `Closed` event. A
    /// queued join, if any, starts only after that event arrives.
    Draining {
        window: W,
        pending: Option<PendingJoin>,
    },
}

pub struct WidgetController<S: Shell, V: ViewRegistry, K: ConsentBroker, B: MessageBus> {
    shell: S,
    views: V,
    consent: K,
    bus: B,
    state: Lifecycle<S::Window, S::Menu>,
    negotiator: ScreenShareNegotiator,
    bounds_correction: BoundsDelta,
    options: ControllerOptions,
}

impl<S: Shell, V: ViewRegistry, K: ConsentBroker, B: MessageBus> WidgetController<S, V, K, B> {
    pub fn new(shell: S, views: V, consent: K, bus: B, options: ControllerOptions) -> Self {
        Self {
            shell,
            views,
            consent,
            bus,
            state: Lifecycle::Closed,
            negotiator: ScreenShareNegotiator::new(),
            bounds_correction: BoundsDelta::default(),
            options,
        }
    }

    pub fn stage(&self) -> LifecycleStage {
        match &self.state {
            Lifecycle::Closed => LifecycleStage::Closed,
            Lifecycle::Opening(_) => LifecycleStage::Opening,
            Lifecycle::Open(active) if active.popout.is_some() => LifecycleStage::OpenWithPopout,
            Lifecycle::Open(_) => LifecycleStage::Open,
            Lifecycle::Draining { .. } => LifecycleStage::Draining,
        }
    }

    pub fn session(&self) -> Option<&CallSession> {
        self.active().map(|active| &active.session)
    }

    pub fn widget_sender(&self) -> Option<SenderId> {
        self.active().map(|active| active.window.sender_id())
    }

    pub fn popout_sender(&self) -> Option<SenderId> {
        self.active()
            .and_then(|active| active.popout.as_ref())
            .map(|popout| popout.window.sender_id())
    }

    pub fn shell(&self) -> &S {
        &self.shell
    }

    pub fn views(&self) -> &V {
        &self.views
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bounds_correction(&self) -> BoundsDelta {
        self.bounds_correction
    }

    fn active(&self) -> Option<&Active<S::Window, S::Menu>> {
        match &self.state {
            Lifecycle::Opening(active) | Lifecycle::Open(active) => Some(active),
            _ => None,
        }
    }

    /// True when `sender` is the widget or pop-out rendering context.
    fn is_own_context(&self, sender: SenderId) -> bool {
        self.active().is_some_and(|active| {
            active.window.sender_id() == sender
                || active
                    .popout
                    .as_ref()
                    .is_some_and(|popout| popout.window.sender_id() == sender)
        })
    }

    /// Handles a `join-call` request from the main view. The reply is
    /// delivered through `token` once the widget acks the join; if the widget
    /// never loads, the request stays pending forever (the caller owns any
    /// timeout policy).
    pub fn join_call(&mut self, sender: SenderId, session: CallSession, token: ResponseToken) {
        let Some(view) = self.views.view_for_sender(sender) else {
            tracing::error!(?sender, "join request from unresolvable sender");
            return;
        };

        // Idempotent join to the already-active call.
        let mut parked = false;
        let mut respond_now = None;
        if let Lifecycle::Opening(active) | Lifecycle::Open(active) = &mut self.state
            && active.session.call_id == session.call_id
        {
            match &active.session_id {
                Some(session_id) => {
                    respond_now = Some(JoinConfirmation {
                        call_id: active.session.call_id.clone(),
                        session_id: session_id.clone(),
                    });
                }
                None => {
                    active.pending_joins.push(token);
                    parked = true;
                }
            }
        }
        if let Some(confirmation) = respond_now {
            self.respond_join(token, &confirmation);
            return;
        }
        if parked {
            return;
        }

        match std::mem::replace(&mut self.state, Lifecycle::Closed) {
            Lifecycle::Closed => self.open_widget(view, session, vec![token]),
            Lifecycle::Opening(mut active) | Lifecycle::Open(mut active) => {
                tracing::debug!(
                    from = %active.session.call_id,
                    to = %session.call_id,
                    "switching call; draining current widget window"
                );
                // Waiters on the old call are abandoned with its window.
                active.pending_joins.clear();
                Self::teardown_popout(&mut active);
                if active.window.is_destroyed() {
                    // No Closed event will come for a dead window.
                    self.bus.broadcast(channels::UPDATE_SHORTCUT_MENU);
                    self.open_widget(view, session, vec![token]);
                } else {
                    active.window.destroy();
                    self.state = Lifecycle::Draining {
                        window: active.window,
                        pending: Some(PendingJoin {
                            view,
                            session,
                            tokens: vec![token],
                        }),
                    };
                }
            }
            Lifecycle::Draining { window, mut pending } => {
                match &mut pending {
                    // Re-joining the queued call parks another waiter on it.
                    Some(queued) if queued.session.call_id == session.call_id => {
                        queued.tokens.push(token);
                    }
                    Some(_) => {
                        tracing::debug!("replacing queued join; previous request stays pending");
                        pending = Some(PendingJoin {
                            view,
                            session,
                            tokens: vec![token],
                        });
                    }
                    None => {
                        pending = Some(PendingJoin {
                            view,
                            session,
                            tokens: vec![token],
                        });
                    }
                }
                self.state = Lifecycle::Draining { window, pending };
            }
        }
    }

    /// Requests widget teardown. No-op when nothing is open; otherwise the
    /// state clears once the platform reports the window closed.
    pub fn close(&mut self) {
        match std::mem::replace(&mut self.state, Lifecycle::Closed) {
            Lifecycle::Closed => {}
            Lifecycle::Draining { window, pending } => {
                self.state = Lifecycle::Draining { window, pending };
            }
            Lifecycle::Opening(mut active) | Lifecycle::Open(mut active) => {
                Self::teardown_popout(&mut active);
                if active.window.is_destroyed() {
                    // No Closed event will come; finish the teardown here.
                    self.bus.broadcast(channels::UPDATE_SHORTCUT_MENU);
                    return;
                }
                tracing::debug!(call_id = %active.session.call_id, "closing call widget window");
                active.window.destroy();
                self.state = Lifecycle::Draining {
                    window: active.window,
                    pending: None,
                };
            }
        }
    }

    fn open_widget(&mut self, view: ViewInfo, session: CallSession, tokens: Vec<ResponseToken>) {
        let canonical_url = match policy::widget_url(&view.server_base, &session) {
            Ok(url) => url,
            Err(err) => {
                tracing::error!(%err, "cannot build widget url");
                return;
            }
        };
        let bounds = anchored_widget_bounds(self.shell.main_window_bounds());
        let mut window = match self
            .shell
            .create_widget_window(&WidgetWindowOptions::overlay(bounds))
        {
            Ok(window) => window,
            Err(err) => {
                tracing::error!(%err, "widget window creation failed");
                return;
            }
        };
        if let Err(err) = window.load_url(&canonical_url, &desktop_user_agent()) {
            // Non-fatal: the joined ack simply never arrives.
            tracing::warn!(%err, "widget url load failed");
        }
        tracing::debug!(call_id = %session.call_id, "opened call widget window");
        self.state = Lifecycle::Opening(Active {
            window,
            canonical_url,
            main_view: ViewRef {
                sender: view.sender,
                server_id: view.server_id,
                server_base: view.server_base,
            },
            session,
            session_id: None,
            pending_joins: tokens,
            popout: None,
        });
    }

    fn respond_join(&mut self, token: ResponseToken, confirmation: &JoinConfirmation) {
        let payload = serde_json::to_value(confirmation).unwrap_or(Value::Null);
        self.bus.respond(token, payload);
    }

    fn teardown_popout(active: &mut Active<S::Window, S::Menu>) {
        if let Some(mut popout) = active.popout.take() {
            popout.menu.dispose();
            if !popout.window.is_destroyed() {
                popout.window.destroy();
            }
        }
    }

    pub fn handle_window_event(&mut self, sender: SenderId, event: WindowEvent) {
        match event {
            WindowEvent::ReadyToShow => self.handle_ready_to_show(sender),
            WindowEvent::FinishedLoad => self.handle_finished_load(sender),
            WindowEvent::Closed => self.handle_closed(sender),
        }
    }

    fn handle_ready_to_show(&mut self, sender: SenderId) {
        match std::mem::replace(&mut self.state, Lifecycle::Closed) {
            Lifecycle::Opening(mut active) if active.window.sender_id() == sender => {
                active.window.show();
                active.window.focus();
                active.window.show_on_all_workspaces();
                active.window.pin_above_screensaver();
                active.window.set_menu_bar_visible(false);
                let target = anchored_widget_bounds(self.shell.main_window_bounds());
                Self::apply_bounds(&mut active.window, &mut self.bounds_correction, target);
                if self.options.open_devtools {
                    active.window.open_devtools();
                }
                tracing::debug!(call_id = %active.session.call_id, "call widget window shown");
                self.state = Lifecycle::Open(active);
            }
            other => {
                // The pop-out paints on its own; only a stray sender is worth
                // a log line.
                if !matches!(
                    &other,
                    Lifecycle::Opening(active) | Lifecycle::Open(active)
                        if active.popout.as_ref().is_some_and(|p| p.window.sender_id() == sender)
                ) {
                    tracing::warn!(?sender, "ready-to-show from unexpected window; ignoring");
                }
                self.state = other;
            }
        }
    }

    fn handle_finished_load(&mut self, sender: SenderId) {
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        let Some(popout) = &mut active.popout else {
            return;
        };
        if popout.window.sender_id() != sender || popout.reloaded {
            return;
        }
        // The user agent cannot be set when the renderer opens the window, so
        // the first completed load is replayed with the desktop user agent.
        // The replay finishes a load of its own, so this must stay one-shot.
        popout.reloaded = true;
        if let Err(err) = popout.window.reload_with_user_agent(&desktop_user_agent()) {
            tracing::warn!(%err, "pop-out reload with desktop user agent failed");
        }
    }

    fn handle_closed(&mut self, sender: SenderId) {
        // Pop-out closure clears only its slot.
        if let Lifecycle::Opening(active) | Lifecycle::Open(active) = &mut self.state
            && active
                .popout
                .as_ref()
                .is_some_and(|popout| popout.window.sender_id() == sender)
        {
            tracing::debug!("pop-out window closed");
            if let Some(mut popout) = active.popout.take() {
                popout.menu.dispose();
            }
            return;
        }

        let is_widget = match &self.state {
            Lifecycle::Opening(active) | Lifecycle::Open(active) => {
                active.window.sender_id() == sender
            }
            Lifecycle::Draining { window, .. } => window.sender_id() == sender,
            Lifecycle::Closed => false,
        };
        if !is_widget {
            tracing::debug!(?sender, "closed event for unknown window");
            return;
        }

        match std::mem::replace(&mut self.state, Lifecycle::Closed) {
            Lifecycle::Closed => {}
            Lifecycle::Opening(mut active) | Lifecycle::Open(mut active) => {
                // Closed underneath us (crash or external teardown).
                Self::teardown_popout(&mut active);
                tracing::debug!(call_id = %active.session.call_id, "call widget window closed");
                self.bus.broadcast(channels::UPDATE_SHORTCUT_MENU);
            }
            Lifecycle::Draining { pending, .. } => {
                self.bus.broadcast(channels::UPDATE_SHORTCUT_MENU);
                if let Some(PendingJoin {
                    view,
                    session,
                    tokens,
                }) = pending
                {
                    self.open_widget(view, session, tokens);
                }
            }
        }
    }

    pub fn handle_message(&mut self, sender: SenderId, message: WidgetMessage) {
        match message {
            WidgetMessage::Resize { width, height } => self.handle_resize(sender, width, height),
            WidgetMessage::ShareScreen {
                source_id,
                with_audio,
            } => self.handle_share_screen(sender, source_id, with_audio),
            WidgetMessage::PopoutFocus => self.handle_popout_focus(sender),
            WidgetMessage::LeaveCall => self.handle_leave_call(sender),
            WidgetMessage::LinkClick { url } => self.handle_link_click(sender, url),
            WidgetMessage::OpenThread { thread_id } => self.forward_to_main_view(
                sender,
                channels::CALLS_OPEN_THREAD,
                json!({ "threadID": thread_id }),
            ),
            WidgetMessage::OpenStopRecordingModal { channel_id } => self.forward_to_main_view(
                sender,
                channels::CALLS_OPEN_STOP_RECORDING_MODAL,
                json!({ "channelID": channel_id }),
            ),
            WidgetMessage::DeprecatedLinkClick => self.handle_deprecated_link_click(sender),
            WidgetMessage::Relay { channel, payload } => {
                self.forward_to_main_view(sender, channel.name(), payload)
            }
            WidgetMessage::CallJoined {
                call_id,
                session_id,
            } => self.handle_call_joined(sender, call_id, session_id),
        }
    }

    fn handle_resize(&mut self, sender: SenderId, width: i32, height: i32) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, "resize from unauthorized sender");
            return;
        }
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        let target = resized_keeping_bottom(active.window.bounds(), width, height);
        Self::apply_bounds(&mut active.window, &mut self.bounds_correction, target);
    }

    fn handle_share_screen(&mut self, sender: SenderId, source_id: String, with_audio: bool) {
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        // Source selection happens in the main app's UI; only the main view
        // may relay it, never the widget itself.
        if active.main_view.sender != sender {
            tracing::warn!(?sender, "share-screen from unauthorized sender");
            return;
        }
        self.bus.send(
            active.window.sender_id(),
            channels::CALLS_WIDGET_SHARE_SCREEN,
            json!({ "sourceID": source_id, "withAudio": with_audio }),
        );
    }

    fn handle_popout_focus(&mut self, sender: SenderId) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, "popout-focus from unauthorized sender");
            return;
        }
        if let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state
            && let Some(popout) = &mut active.popout
        {
            popout.window.focus();
        }
    }

    fn handle_leave_call(&mut self, sender: SenderId) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, "leave-call from unauthorized sender");
            return;
        }
        self.close();
    }

    fn handle_link_click(&mut self, sender: SenderId, url: String) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, "link-click from unauthorized sender");
            return;
        }
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        let Some(view) = self.views.view_for_sender(active.main_view.sender) else {
            tracing::error!("main view is gone; dropping link-click");
            return;
        };
        let server_id = active.main_view.server_id.clone();
        self.views.switch_server(&server_id);
        self.shell.focus_main_window();
        match Url::parse(&url) {
            // Absolute URLs go through deep-link routing; relative paths are
            // in-app history navigation.
            Ok(absolute) => self.views.route_deep_link(absolute),
            Err(_) => self
                .bus
                .send(view.sender, channels::BROWSER_HISTORY_PUSH, Value::String(url)),
        }
    }

    fn handle_deprecated_link_click(&mut self, sender: SenderId) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, "link-click from unauthorized sender");
            return;
        }
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        // This channel ignores any argument and always navigates to the
        // channel URL captured at join time.
        let Some(channel_url) = active.session.channel_url.clone() else {
            tracing::warn!("deprecated link-click with no stored channel url");
            return;
        };
        let Some(view) = self.views.view_for_sender(active.main_view.sender) else {
            tracing::error!("main view is gone; dropping link-click");
            return;
        };
        let server_id = active.main_view.server_id.clone();
        self.views.switch_server(&server_id);
        self.shell.focus_main_window();
        self.bus.send(
            view.sender,
            channels::BROWSER_HISTORY_PUSH,
            Value::String(channel_url),
        );
    }

    fn forward_to_main_view(&mut self, sender: SenderId, channel: &'static str, payload: Value) {
        if !self.is_own_context(sender) {
            tracing::warn!(?sender, channel, "forward from unauthorized sender");
            return;
        }
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        let Some(view) = self.views.view_for_sender(active.main_view.sender) else {
            tracing::error!(channel, "main view is gone; dropping forward");
            return;
        };
        let server_id = active.main_view.server_id.clone();
        self.views.switch_server(&server_id);
        self.shell.focus_main_window();
        self.bus.send(view.sender, channel, payload);
    }

    fn handle_call_joined(&mut self, sender: SenderId, call_id: String, session_id: String) {
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            return;
        };
        if active.window.sender_id() != sender {
            tracing::warn!(?sender, "joined ack from unauthorized sender");
            return;
        }
        if active.session.call_id != call_id {
            tracing::debug!(call_id, "joined ack for a stale call");
            return;
        }
        active.session_id = Some(session_id.clone());
        let waiters = std::mem::take(&mut active.pending_joins);
        let payload = serde_json::to_value(JoinConfirmation {
            call_id,
            session_id,
        })
        .unwrap_or(Value::Null);
        for token in waiters {
            self.bus.respond(token, payload.clone());
        }
    }

    /// Handles a `get-desktop-sources` request. The reply (possibly an empty
    /// list) is always delivered through `token`.
    pub fn get_desktop_sources(
        &mut self,
        sender: SenderId,
        options: &SourceOptions,
        token: ResponseToken,
    ) {
        let entries = self.desktop_sources(sender, options);
        let payload = serde_json::to_value(&entries).unwrap_or_else(|_| Value::Array(Vec::new()));
        self.bus.respond(token, payload);
    }

    fn desktop_sources(&mut self, sender: SenderId, options: &SourceOptions) -> Vec<SourceEntry> {
        let (Lifecycle::Opening(active) | Lifecycle::Open(active)) = &mut self.state else {
            tracing::warn!(?sender, "desktop sources requested with no active call");
            return Vec::new();
        };
        // The widget never enumerates sources itself; only the main view
        // does, on its behalf.
        if active.main_view.sender != sender {
            tracing::warn!(?sender, "desktop sources requested by unauthorized sender");
            return Vec::new();
        }
        let Some(view) = self.views.view_for_sender(sender) else {
            tracing::error!(?sender, "cannot resolve view for desktop sources request");
            return Vec::new();
        };
        let call_id = active.session.call_id.clone();
        let widget = Some(active.window.sender_id());
        self.negotiator.desktop_sources(
            &mut self.shell,
            &mut self.consent,
            &mut self.bus,
            &view,
            &call_id,
            widget,
            options,
        )
    }

    /// Navigation guard for windows this controller owns: only the original
    /// widget URL (query parameters included) is ever allowed.
    pub fn should_navigate(&self, sender: SenderId, target: &str) -> bool {
        match self.active() {
            Some(active) if active.window.sender_id() == sender => {
                let allowed = policy::navigation_allowed(&active.canonical_url, target);
                if !allowed {
                    tracing::warn!(url = target, "blocked widget navigation");
                }
                allowed
            }
            _ => false,
        }
    }

    /// Redirect policy for owned windows: never permitted.
    pub fn should_allow_redirect(&self, sender: SenderId) -> bool {
        if self.is_own_context(sender) {
            tracing::warn!(?sender, "blocked redirect");
            return false;
        }
        true
    }

    /// Gate for window-open attempts from the widget's rendering context.
    pub fn popout_open_decision(&self, sender: SenderId, target: &str) -> PopoutDecision {
        let Some(active) = self.active() else {
            return PopoutDecision::Deny;
        };
        if active.window.sender_id() != sender || active.popout.is_some() {
            tracing::warn!(?sender, url = target, "blocked pop-out open");
            return PopoutDecision::Deny;
        }
        if policy::popout_allowed(&active.main_view.server_base, &active.session.call_id, target) {
            PopoutDecision::Allow {
                auto_hide_menu_bar: true,
            }
        } else {
            tracing::warn!(url = target, "blocked pop-out open");
            PopoutDecision::Deny
        }
    }

    /// Takes ownership of a pop-out window the platform created after an
    /// allowed open. Attaches the shared context menu; redirects stay blocked
    /// through [`Self::should_allow_redirect`].
    pub fn adopt_popout(&mut self, mut window: S::Window) {
        match &mut self.state {
            Lifecycle::Opening(active) | Lifecycle::Open(active) => {
                if active.popout.is_some() {
                    tracing::warn!("pop-out slot already occupied; destroying extra window");
                    window.destroy();
                    return;
                }
                let menu = self.shell.attach_context_menu(&mut window);
                tracing::debug!("adopted pop-out window");
                active.popout = Some(Popout {
                    window,
                    menu,
                    reloaded: false,
                });
            }
            _ => {
                tracing::warn!("pop-out created with no active call; destroying");
                window.destroy();
            }
        }
    }

    /// Applies `requested` through the accumulated bounds correction, then
    /// re-derives the correction from what the platform actually did.
    fn apply_bounds(window: &mut S::Window, correction: &mut BoundsDelta, requested: Bounds) {
        let applied = requested.shifted_by(*correction);
        window.set_bounds(applied);
        *correction = placement_error(applied, window.bounds());
    }
}
