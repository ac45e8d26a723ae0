// src/extractor/keymap.rs

//! Maps host input to tool triggers using the configured keybindings.
//!
//! While a character assignment is in progress every printable key becomes a
//! `Character` trigger unless it is bound to commit, cancel, erase, help or
//! quit. While browsing only bound keys and the arrow keys do anything.

use log::trace;

use crate::config::{KeyCombination, KeybindingsConfig};
use crate::extractor::state::{Mode, Navigation, Trigger};
use crate::keys::{KeySymbol, Modifiers};
use crate::platform::ToolInput;

fn bound(list: &[KeyCombination], symbol: KeySymbol, modifiers: Modifiers) -> bool {
    list.iter().any(|combo| combo.matches(symbol, modifiers))
}

/// The character a key press types, if it types one.
fn typed_char(symbol: KeySymbol, modifiers: Modifiers, text: Option<&str>) -> Option<char> {
    if modifiers.intersects(Modifiers::CONTROL | Modifiers::ALT | Modifiers::SUPER) {
        return None;
    }
    if let Some(ch) = text.and_then(|t| t.chars().next()) {
        return (!ch.is_control()).then_some(ch);
    }
    match symbol {
        KeySymbol::Char(ch) if !ch.is_control() => Some(ch),
        KeySymbol::Space => Some(' '),
        _ => None,
    }
}

/// Translates one input into a trigger, or `None` when it means nothing here.
pub fn trigger_for(input: &ToolInput, mode: &Mode, bindings: &KeybindingsConfig) -> Option<Trigger> {
    let trigger = match input {
        ToolInput::CloseRequested => Some(Trigger::Quit),
        ToolInput::PointerMoved { x, y } => {
            Some(Trigger::Navigate(Navigation::PointTo { x: *x, y: *y }))
        }
        ToolInput::PointerPressed { x, y } => {
            Some(Trigger::Navigate(Navigation::Press { x: *x, y: *y }))
        }
        ToolInput::Key {
            symbol,
            modifiers,
            text,
        } => key_trigger(*symbol, *modifiers, text.as_deref(), mode, bindings),
    };
    trace!("Input {:?} in {:?} -> {:?}", input, mode, trigger);
    trigger
}

fn key_trigger(
    symbol: KeySymbol,
    modifiers: Modifiers,
    text: Option<&str>,
    mode: &Mode,
    bindings: &KeybindingsConfig,
) -> Option<Trigger> {
    let is = |list: &[KeyCombination]| bound(list, symbol, modifiers);

    if is(&bindings.quit) {
        return Some(Trigger::Quit);
    }
    if is(&bindings.toggle_help) {
        return Some(Trigger::ToggleHelp);
    }
    if is(&bindings.commit) {
        return Some(Trigger::Commit);
    }
    if is(&bindings.cancel) {
        return Some(Trigger::Cancel);
    }
    if is(&bindings.erase) {
        return Some(Trigger::Erase);
    }

    if !mode.is_browsing() {
        return typed_char(symbol, modifiers, text).map(Trigger::Character);
    }

    if is(&bindings.save) {
        Some(Trigger::Save)
    } else if is(&bindings.coarser) {
        Some(Trigger::Navigate(Navigation::Coarser))
    } else if is(&bindings.finer) {
        Some(Trigger::Navigate(Navigation::Finer))
    } else if is(&bindings.begin_assign) {
        Some(Trigger::BeginAssign)
    } else if is(&bindings.mark_default) {
        Some(Trigger::MarkDefault)
    } else if is(&bindings.toggle_span) {
        Some(Trigger::Navigate(Navigation::ToggleSpan))
    } else if modifiers.is_empty() {
        symbol
            .direction()
            .map(|dir| Trigger::Navigate(Navigation::Step(dir)))
    } else {
        None
    }
}
