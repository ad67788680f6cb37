// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dispatch core.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use terminput_keys::{
    BRACKETED_PASTE_END, BRACKETED_PASTE_START, ControlKeyError, CursorMode, Modifiers,
    VirtualKey, control_byte, sequence_for,
};

use crate::mode::{InputMode, SurfaceFlags};
use crate::output::{OutputBus, OutputStream};
use crate::state::{SessionEvent, SessionState, StatePublisher, StateWatcher};

/// Everything guarded by the session lock.
#[derive(Debug)]
struct Session {
    state: SessionState,
    output: OutputBus,
    publisher: StatePublisher,
}

impl Session {
    fn publish(&mut self, event: SessionEvent) {
        self.publisher.publish(&self.state, event);
    }

    fn clear_composing(&mut self) {
        if self.state.clear_composing() {
            self.publish(SessionEvent::ComposingChanged {
                text: String::new(),
                cursor: 0,
            });
        }
    }

    /// Write `text`, wrapped in paste markers when bracketed paste is on.
    fn emit_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.state.bracketed_paste {
            self.output.emit(BRACKETED_PASTE_START);
            self.output.emit(text.as_bytes());
            self.output.emit(BRACKETED_PASTE_END);
        } else {
            self.output.emit(text.as_bytes());
        }
    }
}

/// Input dispatch core for one terminal session.
///
/// All methods take `&self` and serialize through an internal lock, so one instance can be
/// shared as `Arc<TerminalInput>` between the UI thread and other producers while output order
/// still matches call order. See the [crate docs](crate) for the output and state model.
pub struct TerminalInput {
    session: Mutex<Session>,
    epoch: Arc<AtomicU64>,
}

impl TerminalInput {
    /// Create a session in [`InputMode::Raw`], not composing, with bracketed paste off and no
    /// subscribers.
    pub fn new() -> Self {
        let state = SessionState::default();
        let output = OutputBus::new();
        let epoch = Arc::clone(output.epoch());
        Self {
            session: Mutex::new(Session {
                publisher: StatePublisher::new(state.clone()),
                state,
                output,
            }),
            epoch,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Session> {
        // Every operation leaves the state valid before it can panic, so a poisoned lock is safe
        // to reuse.
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    // --- Output attachment ---

    /// Attach a new output subscriber.
    ///
    /// The stream receives every chunk emitted from now on, until [`detach`](Self::detach) or
    /// until the stream is dropped.
    pub fn subscribe(&self) -> OutputStream {
        let mut session = self.lock();
        let stream = session.output.subscribe();
        tracing::debug!(
            subscribers = session.output.subscriber_count(),
            "output subscriber attached"
        );
        stream
    }

    /// Detach every output subscriber.
    ///
    /// Existing streams stop yielding immediately, including chunks they had already queued.
    /// Streams created afterwards start empty.
    ///
    /// Returns promptly even if a producer is blocked on a full queue: that emission is
    /// abandoned once the epoch ends.
    pub fn detach(&self) {
        // Advance the epoch before taking the lock: it silences readers and releases an emission
        // blocked on a full queue, which holds the lock.
        let ended = self.epoch.fetch_add(1, Ordering::AcqRel);
        let mut session = self.lock();
        session.output.detach_through(ended);
        tracing::debug!("output detached");
    }

    /// Whether at least one output subscriber is attached.
    pub fn is_attached(&self) -> bool {
        self.lock().output.subscriber_count() > 0
    }

    // --- State observation ---

    /// Copy of the current session state.
    pub fn snapshot(&self) -> SessionState {
        self.lock().state.clone()
    }

    /// Observe state changes from now on.
    pub fn watch(&self) -> StateWatcher {
        self.lock().publisher.watch()
    }

    /// Active input mode.
    pub fn input_mode(&self) -> InputMode {
        self.lock().state.input_mode
    }

    /// Platform surface configuration for the active mode.
    pub fn surface_flags(&self) -> SurfaceFlags {
        self.input_mode().surface_flags()
    }

    // --- Configuration ---

    /// Switch the input mode.
    ///
    /// Publishes [`SessionEvent::ModeChanged`] only when the mode actually changes; that event is
    /// the host's cue to renegotiate the platform keyboard. No bytes are written.
    pub fn set_input_mode(&self, mode: InputMode) {
        let mut session = self.lock();
        if session.state.input_mode == mode {
            return;
        }
        session.state.input_mode = mode;
        session.publish(SessionEvent::ModeChanged(mode));
    }

    /// Enable or disable bracketed-paste wrapping for committed and injected text.
    pub fn set_bracketed_paste_mode(&self, enabled: bool) {
        let mut session = self.lock();
        if session.state.bracketed_paste == enabled {
            return;
        }
        session.state.bracketed_paste = enabled;
        session.publish(SessionEvent::BracketedPasteChanged(enabled));
    }

    /// Record the cursor style the host wants its renderer to show.
    ///
    /// The DECSCUSR sequence ([`CursorMode::sequence`]) is for the renderer and is not written
    /// to the input stream.
    pub fn set_cursor_mode(&self, mode: CursorMode) {
        let mut session = self.lock();
        if session.state.cursor_mode == mode {
            return;
        }
        session.state.cursor_mode = mode;
        session.publish(SessionEvent::CursorModeChanged(mode));
    }

    // --- IME channel ---

    /// Commit `text` from the IME.
    ///
    /// Ends any composition, then writes the UTF-8 bytes as one chunk, or as three chunks
    /// (start marker, text, end marker) with bracketed paste on. Empty text writes nothing.
    pub fn commit_text(&self, text: &str) {
        let mut session = self.lock();
        session.clear_composing();
        session.emit_text(text);
    }

    /// Replace the provisional IME text.
    ///
    /// Never writes bytes. Empty `text` ends the composition. `cursor` is stored for observers as
    /// given, without checking it against the text.
    pub fn set_composing_text(&self, text: &str, cursor: i32) {
        let mut session = self.lock();
        if session.state.set_composing(text, cursor) {
            session.publish(SessionEvent::ComposingChanged {
                text: text.to_owned(),
                cursor,
            });
        }
    }

    /// Commit whatever is being composed.
    ///
    /// With no composition this only makes sure the composing state is clear.
    pub fn finish_composing(&self) {
        let mut session = self.lock();
        let text = session.state.composing_text.clone();
        session.clear_composing();
        session.emit_text(&text);
    }

    /// Backspace from the IME or keyboard.
    ///
    /// While composing, removes the last composed character locally and writes nothing.
    /// Otherwise writes the Backspace sequence.
    pub fn delete_backward(&self) {
        let mut session = self.lock();
        if session.state.is_composing {
            if session.state.pop_composing().is_some() {
                let event = SessionEvent::ComposingChanged {
                    text: session.state.composing_text.clone(),
                    cursor: session.state.composing_cursor,
                };
                session.publish(event);
            }
            return;
        }
        session.output.emit(sequence_for(VirtualKey::Backspace));
    }

    // --- Key channel ---

    /// Write the sequence for `key`.
    ///
    /// `modifiers` do not change the sequence. Ctrl+letter combinations are encoded with
    /// [`send_control_key`](Self::send_control_key); no [`VirtualKey`] is a letter.
    pub fn inject_key(&self, key: VirtualKey, modifiers: Modifiers) {
        let mut session = self.lock();
        if !modifiers.is_empty() {
            tracing::trace!(?key, ?modifiers, "modifiers do not alter virtual key sequences");
        }
        session.output.emit(sequence_for(key));
    }

    /// Write Ctrl+`base` as one control byte (`'c'` → `0x03`).
    ///
    /// Characters outside A–Z (after uppercasing) are rejected and nothing is written.
    pub fn send_control_key(&self, base: char) -> Result<(), ControlKeyError> {
        let byte = control_byte(base).inspect_err(|err| {
            tracing::warn!(%err, "rejected control key");
        })?;
        self.lock().output.emit(&[byte]);
        Ok(())
    }

    /// Write `text` programmatically, for example from a paste button.
    ///
    /// Same encoding and bracketed-paste wrapping as [`commit_text`](Self::commit_text), but the
    /// composition is left untouched.
    pub fn inject_string(&self, text: &str) {
        self.lock().emit_text(text);
    }
}

impl Default for TerminalInput {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TerminalInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let session = self.lock();
        f.debug_struct("TerminalInput")
            .field("state", &session.state)
            .field("subscribers", &session.output.subscriber_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::output::{OUTPUT_CAPACITY, RecvError};

    fn drain(stream: &OutputStream) -> Vec<Vec<u8>> {
        stream.try_iter().map(|chunk| chunk.to_vec()).collect()
    }

    #[test]
    fn starts_raw_and_idle() {
        let input = TerminalInput::new();
        let state = input.snapshot();
        assert_eq!(state.input_mode, InputMode::Raw);
        assert!(!state.is_composing);
        assert!(!state.bracketed_paste);
        assert!(!input.is_attached());
    }

    #[test]
    fn commit_writes_utf8_and_ends_composition() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_composing_text("nihon", 5);
        input.commit_text("日本");

        assert_eq!(drain(&out), vec!["日本".as_bytes().to_vec()]);
        let state = input.snapshot();
        assert!(!state.is_composing);
        assert_eq!(state.composing_text, "");
    }

    #[test]
    fn empty_commit_only_clears_composition() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_composing_text("a", 1);
        input.commit_text("");
        assert!(drain(&out).is_empty(), "empty commit must not emit");
        assert!(!input.snapshot().is_composing);
    }

    #[test]
    fn composing_text_never_reaches_output() {
        let input = TerminalInput::new();
        let out = input.subscribe();

        input.set_composing_text("a", 0);
        let state = input.snapshot();
        assert!(state.is_composing);
        assert_eq!(state.composing_text, "a");

        input.set_composing_text("", 0);
        assert!(!input.snapshot().is_composing);
        assert!(drain(&out).is_empty());
    }

    #[test]
    fn bracketed_commit_is_three_chunks() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_bracketed_paste_mode(true);
        input.commit_text("hi");
        assert_eq!(
            drain(&out),
            vec![b"\x1b[200~".to_vec(), b"hi".to_vec(), b"\x1b[201~".to_vec()]
        );
    }

    #[test]
    fn inject_string_keeps_composition() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_composing_text("draft", 5);
        input.set_bracketed_paste_mode(true);
        input.inject_string("paste");

        assert_eq!(
            drain(&out),
            vec![b"\x1b[200~".to_vec(), b"paste".to_vec(), b"\x1b[201~".to_vec()]
        );
        assert_eq!(input.snapshot().composing_text, "draft");

        input.set_bracketed_paste_mode(false);
        input.inject_string("plain");
        assert_eq!(drain(&out), vec![b"plain".to_vec()]);
    }

    #[test]
    fn control_key_is_case_insensitive() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.send_control_key('c').unwrap();
        input.send_control_key('C').unwrap();
        assert_eq!(drain(&out), vec![vec![0x03], vec![0x03]]);
    }

    #[test]
    fn control_key_rejects_non_letters() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        assert_eq!(
            input.send_control_key('1'),
            Err(ControlKeyError::NotALetter('1'))
        );
        assert!(drain(&out).is_empty(), "rejected key must not emit");
    }

    #[test]
    fn modifiers_do_not_change_key_sequences() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.inject_key(VirtualKey::ArrowUp, Modifiers::empty());
        input.inject_key(VirtualKey::ArrowUp, Modifiers::CTRL | Modifiers::SHIFT);
        input.inject_key(VirtualKey::F5, Modifiers::ALT);
        assert_eq!(
            drain(&out),
            vec![b"\x1b[A".to_vec(), b"\x1b[A".to_vec(), b"\x1b[15~".to_vec()]
        );
    }

    #[test]
    fn mode_change_is_published_once() {
        let input = TerminalInput::new();
        let watcher = input.watch();

        input.set_input_mode(InputMode::Raw);
        input.set_input_mode(InputMode::Raw);
        assert_eq!(watcher.try_next(), None, "raw is already active");

        input.set_input_mode(InputMode::Text);
        input.set_input_mode(InputMode::Text);
        assert_eq!(
            watcher.drain().collect::<Vec<_>>(),
            vec![SessionEvent::ModeChanged(InputMode::Text)]
        );
        assert_eq!(input.surface_flags(), InputMode::Text.surface_flags());
    }

    #[test]
    fn mode_and_paste_toggles_write_nothing() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_input_mode(InputMode::Text);
        input.set_bracketed_paste_mode(true);
        input.set_cursor_mode(CursorMode::SteadyBar);
        assert!(drain(&out).is_empty());
        assert_eq!(input.snapshot().cursor_mode, CursorMode::SteadyBar);
    }

    #[test]
    fn delete_backward_edits_composition_locally() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        let watcher = input.watch();

        input.set_composing_text("ab", 2);
        input.delete_backward();
        assert_eq!(input.snapshot().composing_text, "a");
        input.delete_backward();
        assert!(!input.snapshot().is_composing);
        assert!(drain(&out).is_empty(), "composition edits stay local");

        input.delete_backward();
        assert_eq!(drain(&out), vec![vec![0x7f]]);

        let events: Vec<_> = watcher.drain().collect();
        assert_eq!(
            events.last(),
            Some(&SessionEvent::ComposingChanged {
                text: String::new(),
                cursor: 0
            })
        );
    }

    #[test]
    fn finish_composing_commits_pending_text() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        input.set_composing_text("にほん", 3);
        input.finish_composing();
        assert_eq!(drain(&out), vec!["にほん".as_bytes().to_vec()]);
        assert!(!input.snapshot().is_composing);

        input.finish_composing();
        assert!(drain(&out).is_empty(), "nothing left to commit");
    }

    #[test]
    fn late_subscriber_sees_no_history() {
        let input = TerminalInput::new();
        input.inject_key(VirtualKey::Enter, Modifiers::empty());
        let out = input.subscribe();
        assert!(drain(&out).is_empty());
        input.inject_key(VirtualKey::Tab, Modifiers::empty());
        assert_eq!(drain(&out), vec![b"\t".to_vec()]);
    }

    #[test]
    fn detach_discards_buffered_chunks() {
        let input = TerminalInput::new();
        let old = input.subscribe();
        input.inject_string("buffered");
        input.detach();
        assert!(!input.is_attached());
        assert_eq!(old.try_recv(), None);
        assert_eq!(
            old.recv_timeout(Duration::from_millis(1)),
            Err(RecvError::Detached)
        );

        let new = input.subscribe();
        input.inject_string("fresh");
        assert_eq!(drain(&new), vec![b"fresh".to_vec()]);
    }

    #[test]
    fn full_queue_applies_backpressure() {
        let input = Arc::new(TerminalInput::new());
        let out = input.subscribe();
        for _ in 0..OUTPUT_CAPACITY {
            input.inject_key(VirtualKey::Enter, Modifiers::empty());
        }

        let producer = {
            let input = Arc::clone(&input);
            thread::spawn(move || input.inject_key(VirtualKey::Tab, Modifiers::empty()))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished(), "emission must block on a full queue");

        assert_eq!(out.recv().as_deref(), Some(&b"\r"[..]));
        producer.join().unwrap();

        let rest = drain(&out);
        assert_eq!(rest.len(), OUTPUT_CAPACITY);
        assert_eq!(rest.last(), Some(&b"\t".to_vec()), "nothing was dropped");
    }

    #[test]
    fn detach_releases_producer_blocked_on_stalled_reader() {
        let input = Arc::new(TerminalInput::new());
        let stalled = input.subscribe();
        for _ in 0..OUTPUT_CAPACITY {
            input.inject_key(VirtualKey::Enter, Modifiers::empty());
        }
        let producer = {
            let input = Arc::clone(&input);
            thread::spawn(move || input.inject_key(VirtualKey::Tab, Modifiers::empty()))
        };
        thread::sleep(Duration::from_millis(50));
        assert!(!producer.is_finished(), "producer waits on the full queue");

        let (done_tx, done_rx) = std::sync::mpsc::channel();
        {
            let input = Arc::clone(&input);
            thread::spawn(move || {
                input.detach();
                let _ = done_tx.send(());
            });
        }
        assert!(
            done_rx.recv_timeout(Duration::from_secs(2)).is_ok(),
            "detach must not wait behind a blocked emission"
        );
        producer.join().unwrap();
        assert!(!input.is_attached());
        assert_eq!(stalled.try_recv(), None);

        // The session stays usable.
        let fresh = input.subscribe();
        input.inject_key(VirtualKey::Tab, Modifiers::empty());
        assert_eq!(drain(&fresh), vec![b"\t".to_vec()]);
    }

    #[test]
    fn concurrent_producers_never_interleave_paste() {
        let input = Arc::new(TerminalInput::new());
        input.set_bracketed_paste_mode(true);
        let out = input.subscribe();

        let consumer = thread::spawn(move || out.take(3 * 2 * 50).collect::<Vec<_>>());
        let producers: Vec<_> = ["left", "right"]
            .into_iter()
            .map(|text| {
                let input = Arc::clone(&input);
                thread::spawn(move || {
                    for _ in 0..50 {
                        input.inject_string(text);
                    }
                })
            })
            .collect();
        for producer in producers {
            producer.join().unwrap();
        }

        let chunks = consumer.join().unwrap();
        for wrapper in chunks.chunks(3) {
            assert_eq!(wrapper[0].as_bytes(), BRACKETED_PASTE_START);
            assert!(
                wrapper[1].as_bytes() == b"left" || wrapper[1].as_bytes() == b"right",
                "payload sits between its own markers"
            );
            assert_eq!(wrapper[2].as_bytes(), BRACKETED_PASTE_END);
        }
    }

    #[test]
    fn dropping_session_ends_streams() {
        let input = TerminalInput::new();
        let out = input.subscribe();
        drop(input);
        assert_eq!(out.recv(), None);
    }
}
