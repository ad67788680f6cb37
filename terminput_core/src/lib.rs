// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Terminput Core: the input dispatch core for terminal-style text entry.
//!
//! ## Overview
//!
//! [`TerminalInput`] normalizes three input channels into one ordered byte stream that can be
//! written to a pseudo-terminal or any line-oriented protocol consumer:
//!
//! - **Committed text** ([`TerminalInput::commit_text`], [`TerminalInput::inject_string`]):
//!   encoded as UTF-8, optionally wrapped in bracketed-paste markers.
//! - **Composition** ([`TerminalInput::set_composing_text`]): provisional IME text. It updates
//!   the session state and is never written to the stream until committed.
//! - **Keys** ([`TerminalInput::inject_key`], [`TerminalInput::send_control_key`]): encoded via
//!   the [`terminput_keys`] table.
//!
//! The session also tracks the [`InputMode`] that tells the host how to configure the platform
//! keyboard (see [`InputMode::surface_flags`]).
//!
//! ## Ordering
//!
//! Every operation runs under one lock, and bytes are handed to subscribers while that lock is
//! held. Output order therefore always equals call order, even with several producer threads
//! sharing an `Arc<TerminalInput>`.
//!
//! ## Output
//!
//! [`TerminalInput::subscribe`] attaches an [`OutputStream`]. Each stream has its own queue of
//! [`OUTPUT_CAPACITY`] chunks; when any queue is full the emitting call blocks until the consumer
//! catches up. Nothing is replayed: a stream sees only chunks emitted after it subscribed.
//! [`TerminalInput::detach`] ends every current stream immediately, discarding whatever they had
//! buffered. With no subscribers, emission is a no-op.
//!
//! ## State
//!
//! [`TerminalInput::snapshot`] returns an owned [`SessionState`]. [`TerminalInput::watch`]
//! returns a [`StateWatcher`] that exposes the latest snapshot plus the [`SessionEvent`]s that
//! happen after it was created.
//!
//! ## Example
//!
//! ```
//! use terminput_core::{InputMode, TerminalInput};
//! use terminput_keys::{Modifiers, VirtualKey};
//!
//! let input = TerminalInput::new();
//! let stream = input.subscribe();
//!
//! input.set_composing_text("ka", 2);
//! assert!(input.snapshot().is_composing);
//!
//! input.commit_text("か");
//! input.inject_key(VirtualKey::Enter, Modifiers::empty());
//! input.send_control_key('c').unwrap();
//!
//! let bytes: Vec<u8> = stream.try_iter().flat_map(|chunk| chunk.to_vec()).collect();
//! assert_eq!(bytes, "か\r\x03".as_bytes());
//! assert!(!input.snapshot().is_composing);
//! assert_eq!(input.snapshot().input_mode, InputMode::Raw);
//! ```

mod input;
mod mode;
mod output;
mod state;

pub use input::TerminalInput;
pub use mode::{InputMode, SurfaceFlags};
pub use output::{OUTPUT_CAPACITY, OutputChunk, OutputStream, RecvError, TryIter};
pub use state::{SessionEvent, SessionState, StateWatcher};

pub use terminput_keys::{ControlKeyError, CursorMode, Modifiers, VirtualKey};
