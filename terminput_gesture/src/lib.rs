// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Terminput Gesture: tap versus long-press disambiguation for a single touch interaction.
//!
//! ## Overview
//!
//! [`GestureDisambiguator`] consumes raw pointer events (down, move, up, cancel) with timestamps
//! and positions, plus expirations of a one-shot timer, and classifies the interaction as:
//!
//! - [`GestureOutcome::Tap`]: the pointer went up within the touch slop before the long-press
//!   timeout.
//! - [`GestureOutcome::LongPressAt`]: the pointer stayed within the slop until the timeout.
//! - nothing: the pointer moved beyond the slop (the gesture belongs to a scrolling or dragging
//!   descendant) or the interaction was cancelled.
//!
//! The disambiguator owns no clock and no timer. Each call returns a [`Step`] whose
//! [`TimerCommand`] tells the owner to start or cancel its one-shot timer. Cancellation is
//! reported in the same call that processes the triggering event, and tokens are generation
//! stamped so a timer that fires after it was cancelled is ignored.
//!
//! ## State machine
//!
//! ```text
//! Idle ──down──▶ PressPending ──timer──▶ LongPressFired ──up/cancel──▶ Idle
//!                     │  │
//!                     │  └──move > slop──▶ MovedBeyondSlop ──up/cancel──▶ Idle
//!                     └──up ≤ slop──▶ Idle (Tap)
//! ```
//!
//! ## Usage
//!
//! ```
//! use kurbo::Point;
//! use terminput_gesture::{GestureConfig, GestureDisambiguator, GestureOutcome, TimerCommand};
//!
//! let mut gestures = GestureDisambiguator::new(GestureConfig::default());
//!
//! // Press: the owner is asked to arm its timer.
//! let step = gestures.on_down(Point::new(10.0, 10.0), 1_000);
//! let TimerCommand::Start { token, delay_ms } = step.timer else {
//!     unreachable!("pointer-down always starts the long-press timer");
//! };
//! assert_eq!(delay_ms, 400);
//!
//! // The timer fires while the finger is still down.
//! let step = gestures.on_timer(token);
//! assert_eq!(step.outcome, Some(GestureOutcome::LongPressAt(Point::new(10.0, 10.0))));
//!
//! // Lifting the finger afterwards classifies nothing further.
//! assert_eq!(gestures.on_up(Point::new(10.0, 10.0), 1_600).outcome, None);
//! ```
//!
//! ## Features
//!
//! - `std` (default): enables `std` support for `kurbo`.
//! - `libm`: enables `no_std` builds that rely on `libm` for floating-point math.
//!
//! This crate is `no_std`.

#![no_std]

mod config;
mod disambiguator;

pub use config::GestureConfig;
pub use disambiguator::{
    GestureDisambiguator, GestureOutcome, GestureState, Step, TimerCommand, TimerToken,
};
