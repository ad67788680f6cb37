// Copyright 2025 the Terminput Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Platform input-connection callbacks forwarded to a [`TerminalInput`].
//!
//! Platforms may hand over absent text (a null string); every such call is declined with
//! `false` so the platform falls back to its default behavior.

use terminput_core::TerminalInput;

/// Borrowed adapter between a platform input connection and a session.
///
/// Each method returns `true` when the request was handled.
#[derive(Copy, Clone, Debug)]
pub struct ImeBridge<'a> {
    input: &'a TerminalInput,
}

impl<'a> ImeBridge<'a> {
    /// Bridge to `input`.
    pub fn new(input: &'a TerminalInput) -> Self {
        Self { input }
    }

    /// The IME committed `text`.
    pub fn commit_text(&self, text: Option<&str>) -> bool {
        let Some(text) = text else {
            return declined("commit_text");
        };
        self.input.commit_text(text);
        true
    }

    /// The IME changed its provisional text.
    pub fn set_composing_text(&self, text: Option<&str>, cursor: i32) -> bool {
        let Some(text) = text else {
            return declined("set_composing_text");
        };
        self.input.set_composing_text(text, cursor);
        true
    }

    /// A backspace key arrived through the input connection.
    pub fn delete_backward(&self) -> bool {
        self.input.delete_backward();
        true
    }

    /// The IME asked to delete text around the caret.
    ///
    /// Only deleting `before > 0` characters with `after == 0` is supported: each becomes a
    /// backspace, trimming the composition first when one is active. The terminal owns the
    /// text after the caret, so any other shape is declined.
    pub fn delete_surrounding_text(&self, before: usize, after: usize) -> bool {
        if before == 0 || after != 0 {
            tracing::warn!(before, after, "declined delete_surrounding_text");
            return false;
        }
        for _ in 0..before {
            self.input.delete_backward();
        }
        true
    }

    /// The IME ended composition; commit what was composed.
    pub fn finish_composing(&self) -> bool {
        self.input.finish_composing();
        true
    }

    /// The IME replaced a range of text, for example when applying a suggestion.
    ///
    /// The composition is dropped and `text` is committed. An empty replacement only clears
    /// the composition.
    pub fn replace_range(&self, text: Option<&str>) -> bool {
        let Some(text) = text else {
            return declined("replace_range");
        };
        if text.is_empty() {
            self.input.set_composing_text("", 0);
        } else {
            self.input.commit_text(text);
        }
        true
    }
}

fn declined(request: &'static str) -> bool {
    tracing::warn!(request, "declined IME request without text");
    false
}
