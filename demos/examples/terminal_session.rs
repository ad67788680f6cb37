// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A terminal session driven by scripted platform events.
//!
//! This example shows how to combine:
//! - `terminput_core` for the byte stream and session state,
//! - `terminput_shell` with a fake keyboard, timers and child views,
//! - a consumer thread standing in for the pseudo-terminal writer.
//!
//! Run:
//! - `RUST_LOG=terminput_core=trace,terminput_shell=debug cargo run -p terminput_demos --example terminal_session`

use std::sync::Arc;
use std::thread;

use kurbo::{Point, Rect};
use terminput_core::{InputMode, SurfaceFlags, TerminalInput};
use terminput_gesture::TimerToken;
use terminput_keys::{Modifiers, VirtualKey};
use terminput_shell::{
    ChildLayer, ChildRegion, Disposition, InputSurface, TerminalShell, TimerHost, TouchEvent,
};
use tracing_subscriber::EnvFilter;

/// Soft keyboard that prints what the shell asks of it.
#[derive(Debug, Default)]
struct PrintingKeyboard;

impl InputSurface for PrintingKeyboard {
    fn request_focus(&mut self) -> bool {
        println!("[surface] focus");
        true
    }

    fn show(&mut self) {
        println!("[surface] show keyboard");
    }

    fn hide(&mut self) {
        println!("[surface] hide keyboard");
    }

    fn restart(&mut self, flags: SurfaceFlags) {
        println!("[surface] restart with {flags:?}");
    }
}

/// Timers that remember the last armed token so the script can fire it.
#[derive(Debug, Default)]
struct ManualTimers {
    armed: Option<TimerToken>,
}

impl TimerHost for ManualTimers {
    fn start(&mut self, token: TimerToken, delay_ms: u64) {
        println!("[timers] arm {token:?} for {delay_ms} ms");
        self.armed = Some(token);
    }

    fn cancel(&mut self, token: TimerToken) {
        if self.armed == Some(token) {
            println!("[timers] cancel {token:?}");
            self.armed = None;
        }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Pane {
    Scrollback,
    StatusBar,
}

#[derive(Debug)]
struct Panes {
    regions: [ChildRegion<Pane>; 2],
}

impl ChildLayer for Panes {
    type Id = Pane;

    fn child_regions(&self) -> &[ChildRegion<Pane>] {
        &self.regions
    }

    fn perform_long_click(&mut self, child: Pane) {
        println!("[panes] long click on {child:?}");
    }
}

fn main() {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("terminput_core=info,terminput_shell=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let input = Arc::new(TerminalInput::new());
    let output = input.subscribe();
    let writer = thread::spawn(move || {
        // Ends when the session is detached; chunks still queued then are dropped.
        for chunk in output {
            println!("[pty] {chunk:?}");
        }
    });

    let panes = Panes {
        regions: [
            ChildRegion {
                id: Pane::Scrollback,
                bounds: Rect::new(0.0, 0.0, 400.0, 600.0),
            },
            ChildRegion {
                id: Pane::StatusBar,
                bounds: Rect::new(0.0, 560.0, 400.0, 600.0),
            },
        ],
    };
    let mut shell = TerminalShell::new(
        Arc::clone(&input),
        PrintingKeyboard,
        ManualTimers::default(),
        panes,
    );

    // Tap to raise the keyboard.
    shell.handle_touch(&TouchEvent::down(100.0, 100.0, 0));
    shell.handle_touch(&TouchEvent::up(102.0, 101.0, 90));

    // Type a command through the IME.
    let ime = shell.ime();
    ime.set_composing_text(Some("l"), 1);
    ime.set_composing_text(Some("ls"), 2);
    ime.commit_text(Some("ls -la"));
    input.inject_key(VirtualKey::Enter, Modifiers::empty());

    // Ctrl+C from a hardware keyboard (Android KEYCODE_C).
    shell.handle_key(31, Modifiers::CTRL);

    // The application asks for predictive text, then pastes with bracketed paste on.
    shell.set_input_mode(InputMode::Text);
    input.set_bracketed_paste_mode(true);
    input.inject_string("echo pasted");
    shell.sync_state();

    // Long press on the status bar; a handler that only claims the top-left corner declines.
    shell.set_long_press_handler(|at: Point| {
        if at.x < 20.0 && at.y < 20.0 {
            println!("[handler] context menu at {at:?}");
            Disposition::Handled
        } else {
            Disposition::Pass
        }
    });
    shell.handle_touch(&TouchEvent::down(200.0, 580.0, 1_000));
    if let Some(token) = shell.timers().armed {
        let resolved = shell.on_timer(token);
        println!("[shell] long press resolved to {resolved:?}");
    }
    shell.handle_touch(&TouchEvent::up(200.0, 580.0, 1_500));

    shell.detach();
    if writer.join().is_err() {
        tracing::error!("writer thread panicked");
    }
}
