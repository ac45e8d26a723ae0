// src/keys.rs

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Represents a keyboard modifier.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Modifiers: u8 {
        const SHIFT = 1 << 0;
        const CONTROL = 1 << 1;
        const ALT = 1 << 2; // Also known as Option on macOS
        const SUPER = 1 << 3; // Also known as Windows key or Command key
    }
}

/// Represents a key symbol delivered by the host input layer.
///
/// Only the keys the extraction tool can bind are named; anything else the
/// host sees arrives as `Unknown` (possibly with text attached).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum KeySymbol {
    // Alphanumeric keys
    Char(char),

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Navigation keys
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Home,
    End,
    Insert,
    Delete,

    // Other common keys
    Enter,
    Backspace,
    Tab,
    Escape,
    Space,

    // Unidentified key
    #[default]
    Unknown,
}

impl KeySymbol {
    /// Returns the arrow direction for the four cursor keys.
    pub fn direction(&self) -> Option<Direction> {
        match self {
            KeySymbol::Left => Some(Direction::Left),
            KeySymbol::Right => Some(Direction::Right),
            KeySymbol::Up => Some(Direction::Up),
            KeySymbol::Down => Some(Direction::Down),
            _ => None,
        }
    }
}

/// A single-cell step on the glyph grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    /// `(row, col)` delta of one step.
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
        }
    }
}
