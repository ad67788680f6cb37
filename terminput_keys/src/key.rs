// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Virtual keys and modifier flags.

/// A non-printing key that a keyboard, toolbar, or program can inject.
///
/// The set is closed: every variant has exactly one byte sequence, see
/// [`sequence_for`](crate::sequence_for).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VirtualKey {
    /// Return / Enter.
    Enter,
    /// Escape.
    Escape,
    /// Backspace (delete the character before the cursor).
    Backspace,
    /// Horizontal tab.
    Tab,
    /// Cursor up.
    ArrowUp,
    /// Cursor down.
    ArrowDown,
    /// Cursor left.
    ArrowLeft,
    /// Cursor right.
    ArrowRight,
    /// Home.
    Home,
    /// End.
    End,
    /// Page up.
    PageUp,
    /// Page down.
    PageDown,
    /// Forward delete.
    Delete,
    /// Function key 1.
    F1,
    /// Function key 2.
    F2,
    /// Function key 3.
    F3,
    /// Function key 4.
    F4,
    /// Function key 5.
    F5,
    /// Function key 6.
    F6,
    /// Function key 7.
    F7,
    /// Function key 8.
    F8,
    /// Function key 9.
    F9,
    /// Function key 10.
    F10,
    /// Function key 11.
    F11,
    /// Function key 12.
    F12,
}

impl VirtualKey {
    /// Every virtual key, in declaration order.
    pub const ALL: [Self; 25] = [
        Self::Enter,
        Self::Escape,
        Self::Backspace,
        Self::Tab,
        Self::ArrowUp,
        Self::ArrowDown,
        Self::ArrowLeft,
        Self::ArrowRight,
        Self::Home,
        Self::End,
        Self::PageUp,
        Self::PageDown,
        Self::Delete,
        Self::F1,
        Self::F2,
        Self::F3,
        Self::F4,
        Self::F5,
        Self::F6,
        Self::F7,
        Self::F8,
        Self::F9,
        Self::F10,
        Self::F11,
        Self::F12,
    ];

    /// The canonical byte sequence for this key.
    ///
    /// Shorthand for [`sequence_for`](crate::sequence_for).
    #[inline]
    pub const fn sequence(self) -> &'static [u8] {
        crate::sequence::sequence_for(self)
    }

    /// Returns `true` for F1–F12.
    pub const fn is_function_key(self) -> bool {
        matches!(
            self,
            Self::F1
                | Self::F2
                | Self::F3
                | Self::F4
                | Self::F5
                | Self::F6
                | Self::F7
                | Self::F8
                | Self::F9
                | Self::F10
                | Self::F11
                | Self::F12
        )
    }
}

bitflags::bitflags! {
    /// Modifier keys held during a key press.
    ///
    /// A set: members are unique and order is irrelevant.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct Modifiers: u8 {
        /// Control.
        const CTRL  = 0b0000_0001;
        /// Alt / Option.
        const ALT   = 0b0000_0010;
        /// Shift.
        const SHIFT = 0b0000_0100;
        /// Meta / Command / Super.
        const META  = 0b0000_1000;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_lists_each_key_once() {
        for (i, a) in VirtualKey::ALL.iter().enumerate() {
            for b in &VirtualKey::ALL[i + 1..] {
                assert_ne!(a, b, "duplicate entry in VirtualKey::ALL");
            }
        }
        assert_eq!(
            VirtualKey::ALL
                .iter()
                .filter(|k| k.is_function_key())
                .count(),
            12,
            "expected twelve function keys"
        );
    }

    #[test]
    fn modifiers_are_a_set() {
        let a = Modifiers::CTRL | Modifiers::SHIFT;
        let b = Modifiers::SHIFT | Modifiers::CTRL | Modifiers::CTRL;
        assert_eq!(a, b, "modifier order and repetition must not matter");
        assert!(Modifiers::default().is_empty(), "default is no modifiers");
    }
}
