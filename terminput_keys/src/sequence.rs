// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Key-sequence table and control-character encoding.

use core::fmt;

use crate::key::VirtualKey;

/// Marker written before pasted text when bracketed paste is enabled.
pub const BRACKETED_PASTE_START: &[u8] = b"\x1b[200~";

/// Marker written after pasted text when bracketed paste is enabled.
pub const BRACKETED_PASTE_END: &[u8] = b"\x1b[201~";

/// Returns the canonical byte sequence for `key`.
///
/// The mapping is total: every [`VirtualKey`] maps to exactly one non-empty sequence.
///
/// - Enter, Escape, Backspace and Tab are single control bytes (`CR`, `ESC`, `DEL`, `HT`).
/// - Arrows, Home and End use the CSI final-letter form (`ESC [ A`).
/// - F1–F4 use the SS3 form (`ESC O P` … `ESC O S`).
/// - Paging keys, Delete and F5–F12 use the CSI tilde form (`ESC [ 15 ~`).
pub const fn sequence_for(key: VirtualKey) -> &'static [u8] {
    match key {
        VirtualKey::Enter => b"\r",
        VirtualKey::Escape => b"\x1b",
        VirtualKey::Backspace => b"\x7f",
        VirtualKey::Tab => b"\t",
        VirtualKey::ArrowUp => b"\x1b[A",
        VirtualKey::ArrowDown => b"\x1b[B",
        VirtualKey::ArrowRight => b"\x1b[C",
        VirtualKey::ArrowLeft => b"\x1b[D",
        VirtualKey::Home => b"\x1b[H",
        VirtualKey::End => b"\x1b[F",
        VirtualKey::PageUp => b"\x1b[5~",
        VirtualKey::PageDown => b"\x1b[6~",
        VirtualKey::Delete => b"\x1b[3~",
        VirtualKey::F1 => b"\x1bOP",
        VirtualKey::F2 => b"\x1bOQ",
        VirtualKey::F3 => b"\x1bOR",
        VirtualKey::F4 => b"\x1bOS",
        VirtualKey::F5 => b"\x1b[15~",
        VirtualKey::F6 => b"\x1b[17~",
        VirtualKey::F7 => b"\x1b[18~",
        VirtualKey::F8 => b"\x1b[19~",
        VirtualKey::F9 => b"\x1b[20~",
        VirtualKey::F10 => b"\x1b[21~",
        VirtualKey::F11 => b"\x1b[23~",
        VirtualKey::F12 => b"\x1b[24~",
    }
}

/// Error returned by [`control_byte`] for characters without a Ctrl encoding.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ControlKeyError {
    /// The base character is not an ASCII letter, even after uppercasing.
    NotALetter(char),
}

impl fmt::Display for ControlKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotALetter(c) => write!(f, "no control encoding for {c:?}: expected A-Z"),
        }
    }
}

impl core::error::Error for ControlKeyError {}

/// Encode Ctrl+`base` as a single control byte.
///
/// The byte is `uppercase(base) - '@'`, so `'A'`/`'a'` → `0x01` through `'Z'`/`'z'` → `0x1A`.
///
/// ```
/// use terminput_keys::{ControlKeyError, control_byte};
///
/// assert_eq!(control_byte('C'), Ok(0x03));
/// assert_eq!(control_byte('z'), Ok(0x1a));
/// assert_eq!(control_byte('['), Err(ControlKeyError::NotALetter('[')));
/// ```
pub fn control_byte(base: char) -> Result<u8, ControlKeyError> {
    match u8::try_from(base.to_ascii_uppercase()) {
        Ok(upper @ b'A'..=b'Z') => Ok(upper - b'@'),
        _ => Err(ControlKeyError::NotALetter(base)),
    }
}
