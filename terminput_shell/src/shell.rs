// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The adapter shell that ties platform events to a session.

use std::fmt;
use std::sync::Arc;

use terminput_core::{InputMode, SurfaceFlags, TerminalInput};
use terminput_gesture::{GestureOutcome, Step, TimerCommand, TimerToken};
use terminput_keys::Modifiers;

use crate::ime::ImeBridge;
use crate::keymap::{KeyAction, KeyMap};
use crate::long_press::{ChildLayer, LongPressHandler, LongPressResolution, resolve_long_press};
use crate::platform::{InputSurface, TimerHost};
use crate::touch::{InterceptingTouch, TouchEvent, TouchStrategy};

/// What the shell did with a classified gesture.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchResolution<K> {
    /// A tap focused the shell and raised the keyboard. `focused` is `false` if the platform
    /// refused focus.
    Tap {
        /// Whether focus was granted.
        focused: bool,
    },
    /// A long press was offered to the handler and children.
    LongPress(LongPressResolution<K>),
}

/// Platform-agnostic host view for one terminal session.
///
/// The shell owns the platform capabilities (input surface, timers, children) and a handle to
/// the [`TerminalInput`]. Hosts forward touch, key, IME and timer events to it and call
/// [`sync_state`](Self::sync_state) after anything that may change the session mode.
pub struct TerminalShell<S, T, C: ChildLayer> {
    input: Arc<TerminalInput>,
    /// Mode the input surface was last configured for.
    surface_mode: InputMode,
    surface: S,
    timers: T,
    children: C,
    touch: Box<dyn TouchStrategy>,
    long_press: Option<Box<dyn LongPressHandler>>,
    keys: KeyMap,
}

impl<S: InputSurface, T: TimerHost, C: ChildLayer> TerminalShell<S, T, C> {
    /// Create a shell around `input`.
    ///
    /// Touch handling defaults to [`InterceptingTouch`] with default thresholds and key codes
    /// default to [`KeyMap::android`]. The surface is not restarted here; configure it from
    /// [`surface_flags`](Self::surface_flags) when the platform creates its input connection.
    pub fn new(input: Arc<TerminalInput>, surface: S, timers: T, children: C) -> Self {
        let surface_mode = input.input_mode();
        Self {
            input,
            surface_mode,
            surface,
            timers,
            children,
            touch: Box::new(InterceptingTouch::default()),
            long_press: None,
            keys: KeyMap::android(),
        }
    }

    /// Replace the key map.
    #[must_use]
    pub fn with_keymap(mut self, keys: KeyMap) -> Self {
        self.keys = keys;
        self
    }

    /// Replace the touch strategy, abandoning any touch the old one was tracking.
    #[must_use]
    pub fn with_touch_strategy(mut self, touch: impl TouchStrategy + 'static) -> Self {
        let step = self.touch.reset();
        self.apply_timer(step.timer);
        self.touch = Box::new(touch);
        self
    }

    /// Install the custom long-press callback, replacing any previous one.
    pub fn set_long_press_handler(&mut self, handler: impl LongPressHandler + 'static) {
        self.long_press = Some(Box::new(handler));
    }

    /// Remove the custom long-press callback.
    pub fn clear_long_press_handler(&mut self) {
        self.long_press = None;
    }

    /// The session this shell feeds.
    pub fn input(&self) -> &Arc<TerminalInput> {
        &self.input
    }

    /// Adapter for the platform's input-connection callbacks.
    pub fn ime(&self) -> ImeBridge<'_> {
        ImeBridge::new(&self.input)
    }

    /// The key map in use.
    pub fn keymap(&self) -> &KeyMap {
        &self.keys
    }

    /// The platform input surface.
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// The platform input surface, mutably.
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// The timer host.
    pub fn timers(&self) -> &T {
        &self.timers
    }

    /// The child layer.
    pub fn children(&self) -> &C {
        &self.children
    }

    /// The child layer, mutably, for example to update child bounds after layout.
    pub fn children_mut(&mut self) -> &mut C {
        &mut self.children
    }

    /// Capabilities the input surface should advertise for the current mode.
    pub fn surface_flags(&self) -> SurfaceFlags {
        self.input.surface_flags()
    }

    /// Switch the session's input mode and renegotiate the surface if it changed.
    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input.set_input_mode(mode);
        self.sync_state();
    }

    /// Bring the input surface in line with the session's current mode.
    ///
    /// Restarts the surface once with the new mode's flags if the mode differs from the one the
    /// surface was last configured for, and returns whether it did. Other session changes
    /// (composition, bracketed paste) never touch the surface.
    pub fn sync_state(&mut self) -> bool {
        let mode = self.input.input_mode();
        if mode == self.surface_mode {
            return false;
        }
        tracing::debug!(?mode, "restarting input surface");
        self.surface_mode = mode;
        self.surface.restart(mode.surface_flags());
        true
    }

    /// Feed one pointer event.
    pub fn handle_touch(&mut self, event: &TouchEvent) -> Option<TouchResolution<C::Id>> {
        let step = self.touch.classify(event);
        self.apply(step)
    }

    /// A timer started through the [`TimerHost`] expired.
    pub fn on_timer(&mut self, token: TimerToken) -> Option<TouchResolution<C::Id>> {
        let step = self.touch.on_timer(token);
        self.apply(step)
    }

    /// Check for an elapsed long press against a frame clock.
    ///
    /// For hosts that do not schedule timers; see [`NoTimers`](crate::NoTimers).
    pub fn poll(&mut self, now_ms: u64) -> Option<TouchResolution<C::Id>> {
        let step = self.touch.poll(now_ms);
        self.apply(step)
    }

    /// Route a hardware key press.
    ///
    /// Returns `false` if the key is not mapped and should get the platform's default handling.
    pub fn handle_key(&mut self, code: u32, modifiers: Modifiers) -> bool {
        match self.keys.route(code, modifiers) {
            Some(KeyAction::Virtual(key, modifiers)) => {
                self.input.inject_key(key, modifiers);
                true
            }
            Some(KeyAction::Control(letter)) => self.input.send_control_key(letter).is_ok(),
            None => false,
        }
    }

    /// Focus the shell and raise the soft keyboard.
    ///
    /// Returns whether focus was granted.
    pub fn show_keyboard(&mut self) -> bool {
        let focused = self.surface.request_focus();
        self.surface.show();
        focused
    }

    /// Lower the soft keyboard.
    pub fn hide_keyboard(&mut self) {
        self.surface.hide();
    }

    /// Tear the session down: detach the output, disarm timers and drop any touch in progress.
    pub fn detach(&mut self) {
        self.input.detach();
        let step = self.touch.reset();
        self.apply_timer(step.timer);
    }

    fn apply_timer(&mut self, timer: TimerCommand) {
        match timer {
            TimerCommand::None => {}
            TimerCommand::Start { token, delay_ms } => self.timers.start(token, delay_ms),
            TimerCommand::Cancel(token) => self.timers.cancel(token),
        }
    }

    fn apply(&mut self, step: Step) -> Option<TouchResolution<C::Id>> {
        self.apply_timer(step.timer);
        let outcome = step.outcome?;
        tracing::debug!(?outcome, "gesture");
        Some(match outcome {
            GestureOutcome::Tap(_) => TouchResolution::Tap {
                focused: self.show_keyboard(),
            },
            GestureOutcome::LongPressAt(at) => {
                let handler = self
                    .long_press
                    .as_deref_mut()
                    .map(|handler| handler as &mut dyn LongPressHandler);
                let resolution = resolve_long_press(handler, self.children.child_regions(), at);
                if let LongPressResolution::Child(child) = resolution {
                    self.children.perform_long_click(child);
                }
                TouchResolution::LongPress(resolution)
            }
        })
    }
}

impl<S, T, C: ChildLayer> fmt::Debug for TerminalShell<S, T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TerminalShell")
            .field("input", &self.input)
            .field("keys", &self.keys)
            .field("has_long_press_handler", &self.long_press.is_some())
            .field("surface_mode", &self.surface_mode)
            .finish_non_exhaustive()
    }
}
