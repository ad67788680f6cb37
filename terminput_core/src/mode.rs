// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Input modes and the platform surface configuration they imply.

/// How the platform keyboard should behave.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum InputMode {
    /// Literal typing for shells, editors, and protocols.
    ///
    /// Predictive text, autocorrect, and auto-capitalization are disabled.
    #[default]
    Raw,
    /// Natural-language entry (chat prompts, messages).
    ///
    /// Predictive text, autocorrect, and sentence capitalization are enabled.
    Text,
}

bitflags::bitflags! {
    /// Capabilities the host should enable on the platform input surface.
    ///
    /// An unset flag means the capability must be disabled.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SurfaceFlags: u8 {
        /// Autocorrect.
        const AUTOCORRECT      = 0b0000_0001;
        /// Suggestion strip / predictive text.
        const SUGGESTIONS      = 0b0000_0010;
        /// Capitalize the first letter of each sentence.
        const CAP_SENTENCES    = 0b0000_0100;
        /// Allow newlines in the edited text.
        const MULTI_LINE       = 0b0000_1000;
        /// Treat the field as visible-password text, which keyboards use as a
        /// "no learning, no transformation" hint.
        const VISIBLE_PASSWORD = 0b0001_0000;
    }
}

impl InputMode {
    /// Surface configuration for this mode.
    ///
    /// ```
    /// use terminput_core::{InputMode, SurfaceFlags};
    ///
    /// assert_eq!(InputMode::Raw.surface_flags(), SurfaceFlags::VISIBLE_PASSWORD);
    /// assert!(InputMode::Text.surface_flags().contains(SurfaceFlags::AUTOCORRECT));
    /// ```
    pub const fn surface_flags(self) -> SurfaceFlags {
        match self {
            Self::Raw => SurfaceFlags::VISIBLE_PASSWORD,
            Self::Text => SurfaceFlags::AUTOCORRECT
                .union(SurfaceFlags::SUGGESTIONS)
                .union(SurfaceFlags::CAP_SENTENCES)
                .union(SurfaceFlags::MULTI_LINE),
        }
    }
}
