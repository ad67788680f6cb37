// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Touch events and the interchangeable strategies that classify them.

use kurbo::Point;
use terminput_gesture::{
    GestureConfig, GestureDisambiguator, GestureOutcome, Step, TimerCommand, TimerToken,
};

/// Phase of a pointer event.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TouchPhase {
    /// Pointer went down.
    Down,
    /// Pointer moved while down.
    Move,
    /// Pointer lifted.
    Up,
    /// The platform aborted the interaction.
    Cancel,
}

/// A pointer event in the shell's local coordinates.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct TouchEvent {
    /// Event phase.
    pub phase: TouchPhase,
    /// Pointer position. Ignored for [`TouchPhase::Cancel`].
    pub position: Point,
    /// Monotonic timestamp in milliseconds.
    pub time_ms: u64,
}

impl TouchEvent {
    /// Pointer-down event.
    pub fn down(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(TouchPhase::Down, x, y, time_ms)
    }

    /// Pointer-move event.
    pub fn moved(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(TouchPhase::Move, x, y, time_ms)
    }

    /// Pointer-up event.
    pub fn up(x: f64, y: f64, time_ms: u64) -> Self {
        Self::new(TouchPhase::Up, x, y, time_ms)
    }

    /// Cancel event.
    pub fn cancel(time_ms: u64) -> Self {
        Self::new(TouchPhase::Cancel, 0.0, 0.0, time_ms)
    }

    fn new(phase: TouchPhase, x: f64, y: f64, time_ms: u64) -> Self {
        Self {
            phase,
            position: Point::new(x, y),
            time_ms,
        }
    }
}

/// How the shell turns pointer events into gestures.
///
/// The shell applies the returned [`Step::timer`] command before resolving
/// [`Step::outcome`].
pub trait TouchStrategy {
    /// Feed one pointer event.
    fn classify(&mut self, event: &TouchEvent) -> Step;

    /// A timer started by this strategy expired.
    fn on_timer(&mut self, _token: TimerToken) -> Step {
        Step::NOTHING
    }

    /// Frame-clock alternative to timers.
    fn poll(&mut self, _now_ms: u64) -> Step {
        Step::NOTHING
    }

    /// Abandon any interaction in progress, disarming its timer.
    fn reset(&mut self) -> Step {
        Step::NOTHING
    }
}

/// Shares pointer events with descendants and tells taps from long presses.
///
/// Taps focus the shell and raise the keyboard; long presses go to the custom handler or the
/// child under the finger; drags beyond the slop are left to descendants.
#[derive(Clone, Debug, Default)]
pub struct InterceptingTouch {
    gestures: GestureDisambiguator,
}

impl InterceptingTouch {
    /// Create a strategy with the given thresholds.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            gestures: GestureDisambiguator::new(config),
        }
    }

    /// The underlying state machine.
    pub fn gestures(&self) -> &GestureDisambiguator {
        &self.gestures
    }
}

impl TouchStrategy for InterceptingTouch {
    fn classify(&mut self, event: &TouchEvent) -> Step {
        match event.phase {
            TouchPhase::Down => self.gestures.on_down(event.position, event.time_ms),
            TouchPhase::Move => self.gestures.on_move(event.position, event.time_ms),
            TouchPhase::Up => self.gestures.on_up(event.position, event.time_ms),
            TouchPhase::Cancel => self.gestures.on_cancel(),
        }
    }

    fn on_timer(&mut self, token: TimerToken) -> Step {
        self.gestures.on_timer(token)
    }

    fn poll(&mut self, now_ms: u64) -> Step {
        self.gestures.poll(now_ms)
    }

    fn reset(&mut self) -> Step {
        self.gestures.reset()
    }
}

/// Consumes every pointer event itself: each completed press is a tap.
///
/// No long press and no forwarding to descendants; for hosts where the terminal surface is a
/// single opaque view.
#[derive(Copy, Clone, Debug, Default)]
pub struct ConsumingTouch {
    pressed: bool,
}

impl TouchStrategy for ConsumingTouch {
    fn classify(&mut self, event: &TouchEvent) -> Step {
        match event.phase {
            TouchPhase::Down => {
                self.pressed = true;
                Step::NOTHING
            }
            TouchPhase::Move => Step::NOTHING,
            TouchPhase::Up if self.pressed => {
                self.pressed = false;
                Step {
                    outcome: Some(GestureOutcome::Tap(event.position)),
                    timer: TimerCommand::None,
                }
            }
            TouchPhase::Up | TouchPhase::Cancel => {
                self.pressed = false;
                Step::NOTHING
            }
        }
    }

    fn reset(&mut self) -> Step {
        self.pressed = false;
        Step::NOTHING
    }
}
