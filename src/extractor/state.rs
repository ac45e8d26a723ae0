// src/extractor/state.rs

//! The two-state interaction machine of the extraction tool.
//!
//! `transition` is pure: it maps the current [`Mode`] and one [`Trigger`] to
//! the next mode plus the [`Action`] the extractor must carry out. Grid,
//! descriptor and file system side effects live in the extractor.

use crate::keys::Direction;
use crate::surface::GlyphRect;

/// Interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Selecting a cell or span.
    Browsing,
    /// Waiting for the character to assign to `target`.
    AwaitingCharacter {
        /// Selection captured when assignment began.
        target: GlyphRect,
        /// Character typed so far, if any.
        pending: Option<char>,
    },
}

impl Mode {
    pub fn is_browsing(&self) -> bool {
        matches!(self, Mode::Browsing)
    }
}

/// Input that moves the cursor or reshapes the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Step(Direction),
    /// Pointer hover, in image pixels.
    PointTo { x: u32, y: u32 },
    /// Pointer press, in image pixels. Anchors a span at the pressed cell.
    Press { x: u32, y: u32 },
    Coarser,
    Finer,
    ToggleSpan,
}

/// A semantic tool input, already decoupled from keys and pointer buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Navigate(Navigation),
    BeginAssign,
    Character(char),
    Erase,
    Commit,
    Cancel,
    Save,
    MarkDefault,
    ToggleHelp,
    Quit,
}

/// What the extractor has to do after a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Nothing beyond the mode change.
    None,
    /// The trigger is not accepted in the current mode.
    Rejected(&'static str),
    Navigate(Navigation),
    Commit { ch: char, rect: GlyphRect },
    Save,
    MarkDefault,
    ToggleHelp,
    Quit,
}

/// Computes the next mode. `selection` is the rectangle currently selected
/// while browsing; it becomes the assignment target on `BeginAssign`.
pub fn transition(mode: Mode, trigger: Trigger, selection: GlyphRect) -> (Mode, Action) {
    match (mode, trigger) {
        (_, Trigger::Quit) => (mode, Action::Quit),
        (_, Trigger::ToggleHelp) => (mode, Action::ToggleHelp),

        (Mode::Browsing, Trigger::Navigate(nav)) => (mode, Action::Navigate(nav)),
        (Mode::Browsing, Trigger::BeginAssign) => (
            Mode::AwaitingCharacter {
                target: selection,
                pending: None,
            },
            Action::None,
        ),
        (Mode::Browsing, Trigger::Save) => (mode, Action::Save),
        (Mode::Browsing, Trigger::MarkDefault) => (mode, Action::MarkDefault),
        (Mode::Browsing, Trigger::Character(_) | Trigger::Erase) => {
            (mode, Action::Rejected("no assignment in progress"))
        }
        (Mode::Browsing, Trigger::Commit | Trigger::Cancel) => {
            (mode, Action::Rejected("nothing to commit or cancel"))
        }

        (Mode::AwaitingCharacter { target, .. }, Trigger::Character(ch)) => (
            Mode::AwaitingCharacter {
                target,
                pending: Some(ch),
            },
            Action::None,
        ),
        (Mode::AwaitingCharacter { target, .. }, Trigger::Erase) => (
            Mode::AwaitingCharacter {
                target,
                pending: None,
            },
            Action::None,
        ),
        (Mode::AwaitingCharacter { target, pending }, Trigger::Commit) => match pending {
            Some(ch) => (Mode::Browsing, Action::Commit { ch, rect: target }),
            None => (mode, Action::Rejected("type a character before committing")),
        },
        (Mode::AwaitingCharacter { .. }, Trigger::Cancel) => (Mode::Browsing, Action::None),
        (Mode::AwaitingCharacter { .. }, Trigger::Navigate(_)) => {
            (mode, Action::Rejected("finish or cancel the assignment first"))
        }
        (Mode::AwaitingCharacter { .. }, Trigger::BeginAssign) => {
            (mode, Action::Rejected("assignment already in progress"))
        }
        (Mode::AwaitingCharacter { .. }, Trigger::Save | Trigger::MarkDefault) => {
            (mode, Action::Rejected("only available while browsing"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_log::test;

    const CELL: GlyphRect = GlyphRect {
        x: 16,
        y: 0,
        width: 16,
        height: 16,
    };

    fn awaiting(pending: Option<char>) -> Mode {
        Mode::AwaitingCharacter {
            target: CELL,
            pending,
        }
    }

    #[test]
    fn test_begin_assign_captures_selection() {
        let (mode, action) = transition(Mode::Browsing, Trigger::BeginAssign, CELL);
        assert_eq!(mode, awaiting(None));
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_character_entry_replaces_buffer() {
        let (mode, _) = transition(awaiting(Some('a')), Trigger::Character('b'), CELL);
        assert_eq!(mode, awaiting(Some('b')));
        let (mode, _) = transition(mode, Trigger::Erase, CELL);
        assert_eq!(mode, awaiting(None));
    }

    #[test]
    fn test_commit_returns_to_browsing_with_captured_target() {
        let other = GlyphRect::new(0, 0, 1, 1);
        let (mode, action) = transition(awaiting(Some('A')), Trigger::Commit, other);
        assert_eq!(mode, Mode::Browsing);
        assert_eq!(action, Action::Commit { ch: 'A', rect: CELL });
    }

    #[test]
    fn test_empty_commit_is_rejected() {
        let (mode, action) = transition(awaiting(None), Trigger::Commit, CELL);
        assert_eq!(mode, awaiting(None));
        assert!(matches!(action, Action::Rejected(_)));
    }

    #[test]
    fn test_cancel_discards_assignment() {
        let (mode, action) = transition(awaiting(Some('x')), Trigger::Cancel, CELL);
        assert_eq!(mode, Mode::Browsing);
        assert_eq!(action, Action::None);
    }

    #[test]
    fn test_navigation_and_save_only_while_browsing() {
        let step = Trigger::Navigate(Navigation::Step(Direction::Right));
        assert!(matches!(
            transition(awaiting(None), step, CELL).1,
            Action::Rejected(_)
        ));
        assert!(matches!(
            transition(awaiting(None), Trigger::Save, CELL).1,
            Action::Rejected(_)
        ));
        assert_eq!(
            transition(Mode::Browsing, Trigger::Save, CELL).1,
            Action::Save
        );
    }

    #[test]
    fn test_quit_is_accepted_in_every_mode() {
        for mode in [Mode::Browsing, awaiting(Some('q'))] {
            assert_eq!(transition(mode, Trigger::Quit, CELL).1, Action::Quit);
        }
    }
}
