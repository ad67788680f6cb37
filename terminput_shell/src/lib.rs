// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Terminput Shell: a platform-agnostic host view for a terminal input session.
//!
//! ## Overview
//!
//! [`TerminalShell`] sits between a platform's view system and a
//! [`TerminalInput`](terminput_core::TerminalInput). It:
//!
//! - classifies touches through a [`TouchStrategy`] and resolves them: a tap focuses the view
//!   and raises the soft keyboard; a long press goes to the custom [`LongPressHandler`], or to
//!   the topmost child under the finger.
//! - routes hardware key codes through a [`KeyMap`] to virtual keys or control bytes.
//! - forwards input-connection callbacks through an [`ImeBridge`].
//! - restarts the platform [`InputSurface`] whenever the session's input mode changes.
//!
//! Platform services are passed in as capabilities: [`InputSurface`] for focus and the soft
//! keyboard, [`TimerHost`] for the long-press timer and [`ChildLayer`] for child views.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use terminput_core::{SurfaceFlags, TerminalInput};
//! use terminput_keys::Modifiers;
//! use terminput_shell::{
//!     InputSurface, NoChildren, NoTimers, TerminalShell, TouchEvent, TouchResolution,
//! };
//!
//! #[derive(Default)]
//! struct Keyboard {
//!     visible: bool,
//! }
//!
//! impl InputSurface for Keyboard {
//!     fn request_focus(&mut self) -> bool { true }
//!     fn show(&mut self) { self.visible = true; }
//!     fn hide(&mut self) { self.visible = false; }
//!     fn restart(&mut self, _flags: SurfaceFlags) {}
//! }
//!
//! let input = Arc::new(TerminalInput::new());
//! let output = input.subscribe();
//! let mut shell = TerminalShell::new(input, Keyboard::default(), NoTimers, NoChildren);
//!
//! shell.handle_touch(&TouchEvent::down(20.0, 20.0, 0));
//! let tap = shell.handle_touch(&TouchEvent::up(20.0, 20.0, 60));
//! assert_eq!(tap, Some(TouchResolution::Tap { focused: true }));
//! assert!(shell.surface().visible);
//!
//! // Ctrl+C from a hardware keyboard (Android KEYCODE_C).
//! assert!(shell.handle_key(31, Modifiers::CTRL));
//! assert_eq!(output.try_recv().unwrap().as_bytes(), b"\x03");
//! ```

mod ime;
mod keymap;
mod long_press;
mod platform;
mod shell;
mod touch;

pub use ime::ImeBridge;
pub use keymap::{KeyAction, KeyMap};
pub use long_press::{
    ChildLayer, ChildRegion, Disposition, LongPressHandler, LongPressResolution, NoChildren,
    hit_test_children, resolve_long_press,
};
pub use platform::{InputSurface, NoTimers, TimerHost};
pub use shell::{TerminalShell, TouchResolution};
pub use touch::{ConsumingTouch, InterceptingTouch, TouchEvent, TouchPhase, TouchStrategy};
