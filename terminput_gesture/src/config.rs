// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use kurbo::Point;

/// Thresholds for gesture classification.
///
/// Hosts should fill these from the platform's own values (for example the system long-press
/// timeout and the scaled touch slop) so gestures feel native.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GestureConfig {
    /// Time the pointer must stay down, in milliseconds, before a long press fires.
    pub long_press_timeout_ms: u64,
    /// Maximum displacement per axis, in pixels, still treated as stationary.
    pub touch_slop: f64,
}

impl GestureConfig {
    /// Default long-press timeout in milliseconds.
    pub const DEFAULT_LONG_PRESS_TIMEOUT_MS: u64 = 400;
    /// Default touch slop in pixels.
    pub const DEFAULT_TOUCH_SLOP: f64 = 8.0;

    /// Replace the long-press timeout.
    #[must_use]
    pub fn with_long_press_timeout(mut self, millis: u64) -> Self {
        self.long_press_timeout_ms = millis;
        self
    }

    /// Replace the touch slop.
    #[must_use]
    pub fn with_touch_slop(mut self, slop: f64) -> Self {
        self.touch_slop = slop;
        self
    }

    /// Whether moving from `origin` to `position` leaves the slop region.
    ///
    /// The test is per axis: either `|dx|` or `|dy|` strictly greater than the slop.
    pub fn exceeds_slop(&self, origin: Point, position: Point) -> bool {
        let delta = position - origin;
        let slop = self.touch_slop;
        delta.x > slop || delta.x < -slop || delta.y > slop || delta.y < -slop
    }
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            long_press_timeout_ms: Self::DEFAULT_LONG_PRESS_TIMEOUT_MS,
            touch_slop: Self::DEFAULT_TOUCH_SLOP,
        }
    }
}
