//! Lifecycle controller for an always-on-top call widget window.
//!
//! A real-time call session is represented on screen by a small floating
//! overlay window (the "widget") layered above the main application window,
//! plus an optional detachable "pop-out" window with expanded controls. This
//! crate owns those two windows: it drives their open/close/resize/focus
//! transitions, speaks the message-bus protocol binding them to the main
//! view, enforces the navigation and pop-out URL policy, compensates
//! platform window-placement drift, and negotiates screen-capture sources
//! with the OS permission machinery.
//!
//! The host desktop shell supplies the actual window system, view manager,
//! consent prompts and bus transport through the trait seams in
//! [`platform`] and [`bus`]; everything here runs on the host's single
//! event-loop thread.

pub mod bus;
pub mod capture;
pub mod constants;
pub mod controller;
pub mod geometry;
pub mod logging;
pub mod platform;
pub mod policy;
pub mod session;

pub use bus::{MessageBus, ResponseToken, SenderId, WidgetMessage};
pub use controller::{ControllerOptions, LifecycleStage, PopoutDecision, WidgetController};
pub use geometry::{Bounds, BoundsDelta};
pub use session::{CallSession, JoinConfirmation};
