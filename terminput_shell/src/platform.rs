// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Capabilities the host platform hands to the shell.
//!
//! The shell never reaches for process-wide services (an input-method manager, a main-thread
//! looper); the host passes them in through these traits.

use terminput_core::SurfaceFlags;
use terminput_gesture::TimerToken;

/// The platform's soft keyboard and focus machinery.
pub trait InputSurface {
    /// Ask for input focus. Returns `false` if the platform refused.
    fn request_focus(&mut self) -> bool;

    /// Show the soft keyboard.
    fn show(&mut self);

    /// Hide the soft keyboard.
    fn hide(&mut self);

    /// Tear down and recreate the input connection with new capabilities.
    ///
    /// Called once per input-mode change.
    fn restart(&mut self, flags: SurfaceFlags);
}

/// One-shot timers for long-press detection.
///
/// The shell starts at most one timer at a time; starting a new one replaces the previous.
/// When a timer expires the host calls
/// [`TerminalShell::on_timer`](crate::TerminalShell::on_timer) with its token. Delivering an
/// expiry after [`cancel`](Self::cancel) is harmless.
pub trait TimerHost {
    /// Arm a timer that expires after `delay_ms`.
    fn start(&mut self, token: TimerToken, delay_ms: u64);

    /// Disarm the timer armed with `token`.
    fn cancel(&mut self, token: TimerToken);
}

/// A [`TimerHost`] for hosts that poll instead of scheduling timers.
///
/// Pair it with [`TerminalShell::poll`](crate::TerminalShell::poll).
#[derive(Copy, Clone, Debug, Default)]
pub struct NoTimers;

impl TimerHost for NoTimers {
    fn start(&mut self, _token: TimerToken, _delay_ms: u64) {}

    fn cancel(&mut self, _token: TimerToken) {}
}
