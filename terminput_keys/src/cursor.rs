// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cursor styles.

/// Cursor shape and blink requested by the host.
///
/// Each style corresponds to a DECSCUSR parameter (`ESC [ n SP q`). The sequence is meant for the
/// renderer side of a terminal; input producers record the style but never write it to the
/// input stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum CursorMode {
    /// Blinking block (DECSCUSR 1).
    #[default]
    BlinkingBlock,
    /// Steady block (DECSCUSR 2).
    SteadyBlock,
    /// Blinking underline (DECSCUSR 3).
    BlinkingUnderline,
    /// Steady underline (DECSCUSR 4).
    SteadyUnderline,
    /// Blinking bar (DECSCUSR 5).
    BlinkingBar,
    /// Steady bar (DECSCUSR 6).
    SteadyBar,
}

impl CursorMode {
    /// The DECSCUSR parameter for this style.
    pub const fn param(self) -> u8 {
        match self {
            Self::BlinkingBlock => 1,
            Self::SteadyBlock => 2,
            Self::BlinkingUnderline => 3,
            Self::SteadyUnderline => 4,
            Self::BlinkingBar => 5,
            Self::SteadyBar => 6,
        }
    }

    /// The DECSCUSR sequence selecting this style.
    pub const fn sequence(self) -> &'static [u8] {
        match self {
            Self::BlinkingBlock => b"\x1b[1 q",
            Self::SteadyBlock => b"\x1b[2 q",
            Self::BlinkingUnderline => b"\x1b[3 q",
            Self::SteadyUnderline => b"\x1b[4 q",
            Self::BlinkingBar => b"\x1b[5 q",
            Self::SteadyBar => b"\x1b[6 q",
        }
    }

    /// Returns `true` for the blinking variants.
    pub const fn blinks(self) -> bool {
        self.param() % 2 == 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequence_embeds_param() {
        let all = [
            CursorMode::BlinkingBlock,
            CursorMode::SteadyBlock,
            CursorMode::BlinkingUnderline,
            CursorMode::SteadyUnderline,
            CursorMode::BlinkingBar,
            CursorMode::SteadyBar,
        ];
        for mode in all {
            let seq = mode.sequence();
            assert_eq!(&seq[..2], b"\x1b[", "{mode:?} must start with CSI");
            assert_eq!(seq[2], b'0' + mode.param(), "{mode:?} has the wrong parameter");
            assert_eq!(&seq[3..], b" q", "{mode:?} must end with SP q");
        }
    }

    #[test]
    fn blinking_is_odd() {
        assert!(CursorMode::BlinkingBar.blinks(), "bar 5 blinks");
        assert!(!CursorMode::SteadyUnderline.blinks(), "underline 4 is steady");
        assert_eq!(CursorMode::default(), CursorMode::BlinkingBlock);
    }
}
