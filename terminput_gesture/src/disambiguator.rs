// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The tap / long-press state machine.

use kurbo::Point;

use crate::config::GestureConfig;

/// Classification state of the current interaction.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum GestureState {
    /// No pointer is down.
    #[default]
    Idle,
    /// Pointer is down within the slop; the long-press timer is armed.
    PressPending,
    /// The long press has been reported; waiting for the pointer to lift.
    LongPressFired,
    /// The pointer left the slop; the interaction belongs to a descendant.
    MovedBeyondSlop,
}

/// A classified gesture.
///
/// Both variants carry the pointer-down position, in the owner's coordinate space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Quick press and release within the slop.
    Tap(Point),
    /// Stationary press held past the long-press timeout.
    LongPressAt(Point),
}

impl GestureOutcome {
    /// The position the gesture refers to.
    pub fn position(&self) -> Point {
        match self {
            Self::Tap(p) | Self::LongPressAt(p) => *p,
        }
    }
}

/// Identifies one armed long-press timer.
///
/// Tokens are unique per disambiguator; a token from an earlier interaction never matches the
/// current one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

impl TimerToken {
    /// Raw generation value, for hosts that key timers by integer.
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// What the owner must do with its one-shot timer after a call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TimerCommand {
    /// Leave timers as they are.
    #[default]
    None,
    /// Arm a one-shot timer; call [`GestureDisambiguator::on_timer`] with `token` when it fires.
    ///
    /// Replaces any timer started earlier by the same disambiguator.
    Start {
        /// Token to hand back on expiry.
        token: TimerToken,
        /// Delay before expiry, in milliseconds.
        delay_ms: u64,
    },
    /// Disarm the timer started with this token.
    Cancel(TimerToken),
}

/// Result of feeding one event to the disambiguator.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Step {
    /// Gesture classified by this event, if any.
    pub outcome: Option<GestureOutcome>,
    /// Timer bookkeeping the owner must apply before handling the next event.
    pub timer: TimerCommand,
}

impl Step {
    /// No outcome, no timer change.
    pub const NOTHING: Self = Self {
        outcome: None,
        timer: TimerCommand::None,
    };

    fn timer(timer: TimerCommand) -> Self {
        Self {
            outcome: None,
            timer,
        }
    }
}

/// Active press bookkeeping.
#[derive(Copy, Clone, Debug)]
struct Press {
    down_position: Point,
    deadline: u64,
    token: TimerToken,
}

/// Tap / long-press state machine for one pointer.
///
/// Feed it pointer events in order. Timestamps are milliseconds on any monotonic clock shared by
/// all calls. See the [crate docs](crate) for the state diagram.
#[derive(Clone, Debug)]
pub struct GestureDisambiguator {
    config: GestureConfig,
    state: GestureState,
    press: Option<Press>,
    generation: u64,
}

impl GestureDisambiguator {
    /// Create an idle disambiguator.
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            state: GestureState::Idle,
            press: None,
            generation: 0,
        }
    }

    /// Active configuration.
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next pointer-down.
    pub fn set_config(&mut self, config: GestureConfig) {
        self.config = config;
    }

    /// Current state.
    pub fn state(&self) -> GestureState {
        self.state
    }

    /// Time at which the pending long press fires, if one is armed.
    pub fn deadline(&self) -> Option<u64> {
        match (self.state, self.press) {
            (GestureState::PressPending, Some(press)) => Some(press.deadline),
            _ => None,
        }
    }

    /// Pointer went down at `position`.
    ///
    /// Starts a new interaction. An interaction still in progress is abandoned without a
    /// classification.
    pub fn on_down(&mut self, position: Point, timestamp: u64) -> Step {
        self.generation = self.generation.wrapping_add(1);
        let token = TimerToken(self.generation);
        let delay_ms = self.config.long_press_timeout_ms;
        self.press = Some(Press {
            down_position: position,
            deadline: timestamp.saturating_add(delay_ms),
            token,
        });
        self.state = GestureState::PressPending;
        Step::timer(TimerCommand::Start { token, delay_ms })
    }

    /// Pointer moved to `position`.
    ///
    /// Leaving the slop while the press is pending cancels the long press for good.
    pub fn on_move(&mut self, position: Point, timestamp: u64) -> Step {
        let Some(press) = self.press else {
            return Step::NOTHING;
        };
        if self.state != GestureState::PressPending {
            return Step::NOTHING;
        }
        if timestamp >= press.deadline {
            // The timer is late; the press was stationary until the deadline.
            return self.fire(press, TimerCommand::Cancel(press.token));
        }
        if self.config.exceeds_slop(press.down_position, position) {
            self.state = GestureState::MovedBeyondSlop;
            return Step::timer(TimerCommand::Cancel(press.token));
        }
        Step::NOTHING
    }

    /// Pointer lifted at `position`. Always ends the interaction.
    pub fn on_up(&mut self, position: Point, timestamp: u64) -> Step {
        let Some(press) = self.press.take() else {
            self.state = GestureState::Idle;
            return Step::NOTHING;
        };
        let state = core::mem::take(&mut self.state);
        if state != GestureState::PressPending {
            return Step::NOTHING;
        }

        let cancel = TimerCommand::Cancel(press.token);
        if timestamp >= press.deadline {
            return Step {
                outcome: Some(GestureOutcome::LongPressAt(press.down_position)),
                timer: cancel,
            };
        }
        if self.config.exceeds_slop(press.down_position, position) {
            return Step::timer(cancel);
        }
        Step {
            outcome: Some(GestureOutcome::Tap(press.down_position)),
            timer: cancel,
        }
    }

    /// The platform cancelled the interaction (for example a parent took over the gesture).
    pub fn on_cancel(&mut self) -> Step {
        let state = core::mem::take(&mut self.state);
        match self.press.take() {
            Some(press) if state == GestureState::PressPending => {
                Step::timer(TimerCommand::Cancel(press.token))
            }
            _ => Step::NOTHING,
        }
    }

    /// The owner's timer armed with `token` expired.
    ///
    /// Tokens from cancelled or superseded interactions are ignored.
    pub fn on_timer(&mut self, token: TimerToken) -> Step {
        match self.press {
            Some(press) if self.state == GestureState::PressPending && press.token == token => {
                self.fire(press, TimerCommand::None)
            }
            _ => Step::NOTHING,
        }
    }

    /// Fire the long press if its deadline has passed at `now`.
    ///
    /// For owners that drive the disambiguator from a frame clock instead of a real timer. A
    /// timer the owner may still have armed is cancelled in the same step.
    pub fn poll(&mut self, now: u64) -> Step {
        match self.press {
            Some(press) if self.state == GestureState::PressPending && now >= press.deadline => {
                self.fire(press, TimerCommand::Cancel(press.token))
            }
            _ => Step::NOTHING,
        }
    }

    /// Drop any interaction in progress without a classification.
    ///
    /// Same as [`on_cancel`](Self::on_cancel): a pending long-press timer is cancelled.
    pub fn reset(&mut self) -> Step {
        self.on_cancel()
    }

    fn fire(&mut self, press: Press, timer: TimerCommand) -> Step {
        self.state = GestureState::LongPressFired;
        Step {
            outcome: Some(GestureOutcome::LongPressAt(press.down_position)),
            timer,
        }
    }
}

impl Default for GestureDisambiguator {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SLOP: f64 = 8.0;

    fn disambiguator() -> GestureDisambiguator {
        GestureDisambiguator::new(
            GestureConfig::default()
                .with_long_press_timeout(500)
                .with_touch_slop(SLOP),
        )
    }

    fn started(step: Step) -> TimerToken {
        match step.timer {
            TimerCommand::Start { token, .. } => token,
            other => panic!("expected a timer start, got {other:?}"),
        }
    }

    #[test]
    fn quick_release_is_a_tap() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        let step = g.on_up(Point::new(10.0, 10.0), 1100);

        assert_eq!(step.outcome, Some(GestureOutcome::Tap(Point::new(10.0, 10.0))));
        assert_eq!(step.timer, TimerCommand::Cancel(token));
        assert_eq!(g.state(), GestureState::Idle);

        // The cancelled timer firing late must not produce a long press.
        assert_eq!(g.on_timer(token), Step::NOTHING);
    }

    #[test]
    fn held_press_fires_once() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        assert_eq!(g.deadline(), Some(1500));

        let step = g.on_timer(token);
        assert_eq!(
            step.outcome,
            Some(GestureOutcome::LongPressAt(Point::new(10.0, 10.0)))
        );
        assert_eq!(g.state(), GestureState::LongPressFired);
        assert_eq!(g.deadline(), None);

        // A duplicate expiry and the release classify nothing further.
        assert_eq!(g.on_timer(token), Step::NOTHING);
        assert_eq!(g.on_up(Point::new(10.0, 10.0), 1700), Step::NOTHING);
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn moving_past_slop_cancels_everything() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));

        let step = g.on_move(Point::new(10.0, 10.0 + SLOP + 1.0), 1100);
        assert_eq!(step, Step::timer(TimerCommand::Cancel(token)));
        assert_eq!(g.state(), GestureState::MovedBeyondSlop);

        assert_eq!(g.on_timer(token), Step::NOTHING);
        // Coming back inside the slop does not revive the press.
        assert_eq!(g.on_move(Point::new(10.0, 10.0), 1200), Step::NOTHING);
        assert_eq!(g.on_up(Point::new(10.0, 10.0), 1300), Step::NOTHING);
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn small_moves_keep_the_press() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        assert_eq!(g.on_move(Point::new(10.0 + SLOP, 10.0 - SLOP), 1100), Step::NOTHING);
        assert_eq!(g.state(), GestureState::PressPending);
        assert!(g.on_timer(token).outcome.is_some(), "press within slop still fires");
    }

    #[test]
    fn release_outside_slop_is_not_a_tap() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        let step = g.on_up(Point::new(40.0, 10.0), 1100);
        assert_eq!(step, Step::timer(TimerCommand::Cancel(token)));
    }

    #[test]
    fn cancel_disarms_pending_timer() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        assert_eq!(g.on_cancel(), Step::timer(TimerCommand::Cancel(token)));
        assert_eq!(g.state(), GestureState::Idle);
        assert_eq!(g.on_timer(token), Step::NOTHING);
        // Nothing left to cancel.
        assert_eq!(g.on_cancel(), Step::NOTHING);
    }

    #[test]
    fn cancel_after_long_press_is_silent() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        assert!(g.on_timer(token).outcome.is_some(), "long press fired");
        assert_eq!(g.on_cancel(), Step::NOTHING);
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn late_timer_is_resolved_by_event_time() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));

        // The owner's timer has not run yet, but the release happens after the deadline.
        let step = g.on_up(Point::new(10.0, 10.0), 1600);
        assert_eq!(
            step.outcome,
            Some(GestureOutcome::LongPressAt(Point::new(10.0, 10.0)))
        );
        assert_eq!(step.timer, TimerCommand::Cancel(token));
        assert_eq!(g.on_timer(token), Step::NOTHING);
    }

    #[test]
    fn new_down_supersedes_old_token() {
        let mut g = disambiguator();
        let first = started(g.on_down(Point::new(10.0, 10.0), 1000));
        let second = started(g.on_down(Point::new(50.0, 50.0), 1100));
        assert_ne!(first, second);

        assert_eq!(g.on_timer(first), Step::NOTHING);
        assert_eq!(
            g.on_timer(second).outcome,
            Some(GestureOutcome::LongPressAt(Point::new(50.0, 50.0)))
        );
    }

    #[test]
    fn poll_fires_at_deadline() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(3.0, 4.0), 1000));
        assert_eq!(g.poll(1499), Step::NOTHING);
        let step = g.poll(1500);
        assert_eq!(
            step.outcome,
            Some(GestureOutcome::LongPressAt(Point::new(3.0, 4.0)))
        );
        assert_eq!(step.timer, TimerCommand::Cancel(token), "an armed timer is now moot");
        assert_eq!(g.poll(2000), Step::NOTHING);
    }

    #[test]
    fn move_after_deadline_fires_and_disarms() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        let step = g.on_move(Point::new(11.0, 10.0), 1600);
        assert_eq!(
            step.outcome,
            Some(GestureOutcome::LongPressAt(Point::new(10.0, 10.0)))
        );
        assert_eq!(step.timer, TimerCommand::Cancel(token));
        assert_eq!(g.on_timer(token), Step::NOTHING);
    }

    #[test]
    fn stray_events_while_idle_are_ignored() {
        let mut g = disambiguator();
        assert_eq!(g.on_move(Point::new(1.0, 1.0), 10), Step::NOTHING);
        assert_eq!(g.on_up(Point::new(1.0, 1.0), 20), Step::NOTHING);
        assert_eq!(g.on_cancel(), Step::NOTHING);
        assert_eq!(g.state(), GestureState::Idle);
    }

    #[test]
    fn reset_abandons_interaction() {
        let mut g = disambiguator();
        let token = started(g.on_down(Point::new(10.0, 10.0), 1000));
        assert_eq!(g.reset(), Step::timer(TimerCommand::Cancel(token)));
        assert_eq!(g.state(), GestureState::Idle);
        assert_eq!(g.reset(), Step::NOTHING, "nothing left to disarm");
        assert_eq!(g.on_timer(token), Step::NOTHING);
        assert_eq!(g.on_up(Point::new(10.0, 10.0), 1100), Step::NOTHING);
    }
}
