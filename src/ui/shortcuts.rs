// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard shortcuts for the editors.
//!
//! Shortcuts are ignored while a text-entry control holds focus, so typing a
//! layer name never deletes or duplicates anything.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Key {
    Z,
    Y,
    D,
    Delete,
    Backspace,
    Escape,
    Other,
}

/// A key press with its modifier state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyChord {
    pub key: Key,
    /// Ctrl on Linux/Windows, Cmd on macOS.
    pub command: bool,
    pub shift: bool,
}

impl KeyChord {
    pub fn plain(key: Key) -> Self {
        Self {
            key,
            command: false,
            shift: false,
        }
    }

    pub fn command(key: Key) -> Self {
        Self {
            key,
            command: true,
            shift: false,
        }
    }

    pub fn command_shift(key: Key) -> Self {
        Self {
            key,
            command: true,
            shift: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Shortcut {
    Undo,
    Redo,
    Duplicate,
    Delete,
    Deselect,
}

/// Map a key press to an editor shortcut.
pub fn resolve(chord: KeyChord, text_input_focused: bool) -> Option<Shortcut> {
    if text_input_focused {
        return None;
    }
    match (chord.key, chord.command, chord.shift) {
        (Key::Z, true, false) => Some(Shortcut::Undo),
        (Key::Z, true, true) | (Key::Y, true, _) => Some(Shortcut::Redo),
        (Key::D, true, false) => Some(Shortcut::Duplicate),
        (Key::Delete | Key::Backspace, false, _) => Some(Shortcut::Delete),
        (Key::Escape, _, _) => Some(Shortcut::Deselect),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bindings() {
        assert_eq!(resolve(KeyChord::command(Key::Z), false), Some(Shortcut::Undo));
        assert_eq!(
            resolve(KeyChord::command_shift(Key::Z), false),
            Some(Shortcut::Redo)
        );
        assert_eq!(resolve(KeyChord::command(Key::Y), false), Some(Shortcut::Redo));
        assert_eq!(
            resolve(KeyChord::command(Key::D), false),
            Some(Shortcut::Duplicate)
        );
        assert_eq!(
            resolve(KeyChord::plain(Key::Backspace), false),
            Some(Shortcut::Delete)
        );
        assert_eq!(resolve(KeyChord::plain(Key::Z), false), None);
    }

    #[test]
    fn test_text_focus_blocks_everything() {
        for chord in [
            KeyChord::command(Key::Z),
            KeyChord::command(Key::D),
            KeyChord::plain(Key::Delete),
        ] {
            assert_eq!(resolve(chord, true), None);
        }
    }
}
