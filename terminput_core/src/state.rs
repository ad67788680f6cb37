// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Session state, change events, and watchers.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

use terminput_keys::CursorMode;

use crate::mode::InputMode;

/// Snapshot of an input session.
///
/// `is_composing` is `true` exactly when `composing_text` is non-empty.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionState {
    /// Active input mode.
    pub input_mode: InputMode,
    /// Whether the IME has provisional text.
    pub is_composing: bool,
    /// Provisional IME text; never written to the output stream.
    pub composing_text: String,
    /// Caret index the IME reported for the composing text. Not validated.
    pub composing_cursor: i32,
    /// Whether committed and injected text is wrapped in paste markers.
    pub bracketed_paste: bool,
    /// Cursor style requested by the host.
    pub cursor_mode: CursorMode,
}

impl SessionState {
    pub(crate) fn set_composing(&mut self, text: &str, cursor: i32) -> bool {
        if self.composing_text == text && self.composing_cursor == cursor {
            return false;
        }
        self.composing_text.clear();
        self.composing_text.push_str(text);
        self.composing_cursor = cursor;
        self.is_composing = !self.composing_text.is_empty();
        true
    }

    pub(crate) fn clear_composing(&mut self) -> bool {
        self.set_composing("", 0)
    }

    /// Remove the last character of the composing text, keeping the caret in range.
    pub(crate) fn pop_composing(&mut self) -> Option<char> {
        let removed = self.composing_text.pop()?;
        let len = i32::try_from(self.composing_text.chars().count()).unwrap_or(i32::MAX);
        self.composing_cursor = self.composing_cursor.min(len);
        self.is_composing = !self.composing_text.is_empty();
        Some(removed)
    }
}

/// A change to the session state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The input mode changed; hosts should renegotiate the platform input surface.
    ModeChanged(InputMode),
    /// The composing text or its caret changed. Empty text means composition ended.
    ComposingChanged {
        /// New composing text.
        text: String,
        /// New caret index.
        cursor: i32,
    },
    /// Bracketed paste was switched on or off.
    BracketedPasteChanged(bool),
    /// The requested cursor style changed.
    CursorModeChanged(CursorMode),
}

/// Observer of one session's state.
///
/// [`StateWatcher::snapshot`] always reflects the latest state. The event methods yield only
/// changes that happened after the watcher was created. Events queue until they are read, so a
/// watcher that only needs the current state should use [`snapshot`](Self::snapshot) and be
/// dropped, or be drained regularly.
#[derive(Debug)]
pub struct StateWatcher {
    latest: Arc<RwLock<SessionState>>,
    rx: Receiver<SessionEvent>,
}

impl StateWatcher {
    /// Latest state of the session.
    pub fn snapshot(&self) -> SessionState {
        self.latest
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Next pending event, without blocking.
    pub fn try_next(&self) -> Option<SessionEvent> {
        self.rx.try_recv().ok()
    }

    /// Wait at most `timeout` for the next event.
    ///
    /// Returns `None` on timeout or once the session has been dropped.
    pub fn next_timeout(&self, timeout: Duration) -> Option<SessionEvent> {
        match self.rx.recv_timeout(timeout) {
            Ok(event) => Some(event),
            Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => None,
        }
    }

    /// Drain every pending event.
    pub fn drain(&self) -> impl Iterator<Item = SessionEvent> + '_ {
        self.rx.try_iter()
    }
}

/// Publishes state changes to watchers.
#[derive(Debug)]
pub(crate) struct StatePublisher {
    latest: Arc<RwLock<SessionState>>,
    watchers: Vec<Sender<SessionEvent>>,
}

impl StatePublisher {
    pub(crate) fn new(initial: SessionState) -> Self {
        Self {
            latest: Arc::new(RwLock::new(initial)),
            watchers: Vec::new(),
        }
    }

    pub(crate) fn watch(&mut self) -> StateWatcher {
        let (tx, rx) = mpsc::channel();
        self.watchers.push(tx);
        StateWatcher {
            latest: Arc::clone(&self.latest),
            rx,
        }
    }

    /// Store `state` as the latest snapshot and notify watchers of `event`.
    pub(crate) fn publish(&mut self, state: &SessionState, event: SessionEvent) {
        *self.latest.write().unwrap_or_else(PoisonError::into_inner) = state.clone();
        tracing::debug!(?event, "session state changed");
        self.watchers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
