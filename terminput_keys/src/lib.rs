// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Terminput Keys: the byte-level vocabulary of terminal input.
//!
//! ## Overview
//!
//! This crate is the single source of truth for the bytes a terminal expects when a user presses
//! a non-printing key. It holds no state and performs no I/O.
//!
//! - [`VirtualKey`]: the closed set of keys a touch keyboard or hardware keyboard can inject
//!   (Enter, Escape, arrows, paging keys, F1–F12, …).
//! - [`sequence_for`]: total mapping from a [`VirtualKey`] to its canonical byte sequence.
//! - [`Modifiers`]: the Ctrl/Alt/Shift/Meta set that accompanies a key press.
//! - [`control_byte`]: Ctrl+letter encoding (`'A'` → `0x01` … `'Z'` → `0x1A`).
//! - [`BRACKETED_PASTE_START`] / [`BRACKETED_PASTE_END`]: markers that wrap pasted text.
//! - [`CursorMode`]: cursor styles and their DECSCUSR sequences.
//!
//! ## Example
//!
//! ```
//! use terminput_keys::{VirtualKey, control_byte, sequence_for};
//!
//! assert_eq!(sequence_for(VirtualKey::Enter), b"\r");
//! assert_eq!(sequence_for(VirtualKey::ArrowUp), b"\x1b[A");
//! assert_eq!(sequence_for(VirtualKey::F5), b"\x1b[15~");
//! assert_eq!(control_byte('c'), Ok(0x03));
//! ```
//!
//! Callers must not spell these sequences themselves; route through this crate so every
//! producer agrees on the bytes.
//!
//! This crate is `no_std`.

#![no_std]

mod cursor;
mod key;
mod sequence;

pub use cursor::CursorMode;
pub use key::{Modifiers, VirtualKey};
pub use sequence::{
    BRACKETED_PASTE_END, BRACKETED_PASTE_START, ControlKeyError, control_byte, sequence_for,
};
