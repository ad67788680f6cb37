// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform key codes to terminal key actions.

use hashbrown::HashMap;
use terminput_keys::{Modifiers, VirtualKey};

/// What a hardware key press means for the terminal.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum KeyAction {
    /// Inject a virtual key.
    Virtual(VirtualKey, Modifiers),
    /// Ctrl+letter; encode as a control byte. The letter is uppercase.
    Control(char),
}

/// Android `KeyEvent` key codes used by [`KeyMap::android`].
mod android {
    pub(super) const KEYCODE_A: u32 = 29;
    pub(super) const KEYCODE_DPAD_UP: u32 = 19;
    pub(super) const KEYCODE_DPAD_DOWN: u32 = 20;
    pub(super) const KEYCODE_DPAD_LEFT: u32 = 21;
    pub(super) const KEYCODE_DPAD_RIGHT: u32 = 22;
    pub(super) const KEYCODE_TAB: u32 = 61;
    pub(super) const KEYCODE_ENTER: u32 = 66;
    pub(super) const KEYCODE_DEL: u32 = 67;
    pub(super) const KEYCODE_PAGE_UP: u32 = 92;
    pub(super) const KEYCODE_PAGE_DOWN: u32 = 93;
    pub(super) const KEYCODE_ESCAPE: u32 = 111;
    pub(super) const KEYCODE_FORWARD_DEL: u32 = 112;
    pub(super) const KEYCODE_MOVE_HOME: u32 = 122;
    pub(super) const KEYCODE_MOVE_END: u32 = 123;
    pub(super) const KEYCODE_F1: u32 = 131;
}

/// Maps a platform's key codes to [`KeyAction`]s.
///
/// Codes that are not mapped fall through to the platform's default handling.
///
/// ```
/// use terminput_keys::{Modifiers, VirtualKey};
/// use terminput_shell::{KeyAction, KeyMap};
///
/// let map = KeyMap::android();
/// assert_eq!(
///     map.route(66, Modifiers::empty()),
///     Some(KeyAction::Virtual(VirtualKey::Enter, Modifiers::empty()))
/// );
/// // KEYCODE_C with Ctrl held.
/// assert_eq!(map.route(31, Modifiers::CTRL), Some(KeyAction::Control('C')));
/// // A plain letter is left to the IME.
/// assert_eq!(map.route(31, Modifiers::empty()), None);
/// ```
#[derive(Clone, Debug, Default)]
pub struct KeyMap {
    keys: HashMap<u32, VirtualKey>,
    /// Code of `A`; `A`–`Z` must be contiguous from here.
    letter_base: Option<u32>,
}

impl KeyMap {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// The mapping for Android key codes.
    pub fn android() -> Self {
        use android::*;

        let mut map = Self::new().with_letter_range(KEYCODE_A);
        for (code, key) in [
            (KEYCODE_ENTER, VirtualKey::Enter),
            (KEYCODE_ESCAPE, VirtualKey::Escape),
            (KEYCODE_DEL, VirtualKey::Backspace),
            (KEYCODE_TAB, VirtualKey::Tab),
            (KEYCODE_DPAD_UP, VirtualKey::ArrowUp),
            (KEYCODE_DPAD_DOWN, VirtualKey::ArrowDown),
            (KEYCODE_DPAD_LEFT, VirtualKey::ArrowLeft),
            (KEYCODE_DPAD_RIGHT, VirtualKey::ArrowRight),
            (KEYCODE_MOVE_HOME, VirtualKey::Home),
            (KEYCODE_MOVE_END, VirtualKey::End),
            (KEYCODE_PAGE_UP, VirtualKey::PageUp),
            (KEYCODE_PAGE_DOWN, VirtualKey::PageDown),
            (KEYCODE_FORWARD_DEL, VirtualKey::Delete),
        ] {
            map.insert(code, key);
        }
        // F1..F12 are contiguous.
        let function_keys = VirtualKey::ALL.into_iter().filter(|k| k.is_function_key());
        for (code, key) in (KEYCODE_F1..).zip(function_keys) {
            map.insert(code, key);
        }
        map
    }

    /// Declare that `first` is the code of `A` and `A`–`Z` are contiguous.
    ///
    /// Enables Ctrl+letter routing.
    #[must_use]
    pub fn with_letter_range(mut self, first: u32) -> Self {
        self.letter_base = Some(first);
        self
    }

    /// Map `code` to `key`, returning the previous mapping.
    pub fn insert(&mut self, code: u32, key: VirtualKey) -> Option<VirtualKey> {
        self.keys.insert(code, key)
    }

    /// The virtual key mapped to `code`.
    pub fn lookup(&self, code: u32) -> Option<VirtualKey> {
        self.keys.get(&code).copied()
    }

    /// The letter for `code`, if it falls in the letter range.
    pub fn letter(&self, code: u32) -> Option<char> {
        let offset = code.checked_sub(self.letter_base?)?;
        let offset = u8::try_from(offset).ok().filter(|o| *o < 26)?;
        Some(char::from(b'A' + offset))
    }

    /// Route a key press.
    ///
    /// Ctrl with a letter becomes [`KeyAction::Control`]; a mapped code becomes
    /// [`KeyAction::Virtual`] carrying `modifiers`; anything else is `None`.
    pub fn route(&self, code: u32, modifiers: Modifiers) -> Option<KeyAction> {
        if modifiers.contains(Modifiers::CTRL)
            && let Some(letter) = self.letter(code)
        {
            return Some(KeyAction::Control(letter));
        }
        self.lookup(code).map(|key| KeyAction::Virtual(key, modifiers))
    }

    /// Number of mapped codes, not counting the letter range.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether no codes are mapped.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}
