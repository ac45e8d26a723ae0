// src/extractor/view.rs

//! Derives what the tool shows from the extractor state.
//!
//! Paint order of the overlay: source image, committed glyphs, span, cursor,
//! grid lines. Every layer is blended over the previous ones.

use std::fmt::Write as _;

use crate::color::Rgba;
use crate::config::{KeyCombination, ViewConfig};
use crate::extractor::{Extractor, Mode};
use crate::keys::Modifiers;
use crate::platform::Frame;
use crate::surface::{GlyphRect, PixelBuffer};

fn blend(buffer: &mut PixelBuffer, x: u32, y: u32, color: Rgba) {
    if let Some(base) = buffer.pixel(x, y) {
        buffer.set_pixel(x, y, color.over(base));
    }
}

/// The source image with the tool overlay drawn in, at image resolution.
pub fn overlay(extractor: &Extractor, view: &ViewConfig) -> PixelBuffer {
    let mut buffer = extractor.image().clone();
    let state = extractor.grid_state();
    let grid = state.grid();

    for rect in extractor.descriptor().glyphs.values() {
        buffer.tint_rect(*rect, view.committed_color);
    }

    match extractor.mode() {
        Mode::AwaitingCharacter { target, .. } => buffer.tint_rect(target, view.cursor_color),
        Mode::Browsing => {
            if state.anchor().is_some() {
                if let Ok(span) = state.selection() {
                    buffer.tint_rect(span, view.span_color);
                }
            }
            let (row, col) = state.cursor();
            if let Ok(cell) = grid.cell_at(row, col) {
                buffer.tint_rect(cell.rect(), view.cursor_color);
            }
        }
    }

    let (cell_w, cell_h) = grid.cell_size();
    let (covered_w, covered_h) = (cell_w * grid.cols() as u32, cell_h * grid.rows() as u32);
    for col in 0..grid.cols() as u32 {
        let x = col * cell_w;
        for y in 0..covered_h {
            blend(&mut buffer, x, y, view.grid_color);
        }
    }
    for row in 0..grid.rows() as u32 {
        let y = row * cell_h;
        for x in 0..covered_w {
            // Crossings were already drawn by the vertical pass.
            if x % cell_w != 0 {
                blend(&mut buffer, x, y, view.grid_color);
            }
        }
    }
    buffer
}

fn describe_rect(rect: &GlyphRect) -> String {
    format!("{},{} {}x{}", rect.x, rect.y, rect.width, rect.height)
}

/// One-line status: resolution, cursor cell, selection and mode.
pub fn caption(extractor: &Extractor) -> String {
    let grid = extractor.grid();
    let (row, col) = extractor.grid_state().cursor();
    let (cell_w, cell_h) = grid.cell_size();
    let mut text = format!(
        "grid {}x{} ({}x{} px) | cell ({}, {})",
        grid.rows(),
        grid.cols(),
        cell_w,
        cell_h,
        row,
        col
    );
    if let Ok(selection) = extractor.selection() {
        let _ = write!(text, " | sel {}", describe_rect(&selection));
    }
    match extractor.mode() {
        Mode::Browsing => text.push_str(" | BROWSING"),
        Mode::AwaitingCharacter { pending, .. } => match pending {
            Some(ch) => {
                let _ = write!(text, " | ASSIGN '{}'", ch.escape_default());
            }
            None => text.push_str(" | ASSIGN _"),
        },
    }
    let _ = write!(text, " | {} glyphs", extractor.descriptor().glyphs.len());
    if extractor.has_unsaved_changes() {
        text.push_str(" *");
    }
    text
}

fn describe_combo(combo: &KeyCombination) -> String {
    let mut out = String::new();
    for (flag, name) in [
        (Modifiers::CONTROL, "Ctrl+"),
        (Modifiers::ALT, "Alt+"),
        (Modifiers::SUPER, "Super+"),
        (Modifiers::SHIFT, "Shift+"),
    ] {
        if combo.modifiers.contains(flag) {
            out.push_str(name);
        }
    }
    let _ = write!(out, "{:?}", combo.symbol);
    out
}

fn describe_keys(list: &[KeyCombination]) -> String {
    list.iter().map(describe_combo).collect::<Vec<_>>().join(" / ")
}

/// Help text for the configured keybindings.
pub fn help_lines(extractor: &Extractor) -> Vec<String> {
    let keys = extractor.bindings();
    vec![
        format!(
            "Resolution: {} finer, {} coarser",
            describe_keys(&keys.finer),
            describe_keys(&keys.coarser)
        ),
        format!(
            "Select: arrows or pointer; {} anchors a span",
            describe_keys(&keys.toggle_span)
        ),
        format!(
            "Assign: {}, type the character, {} commits, {} cancels",
            describe_keys(&keys.begin_assign),
            describe_keys(&keys.commit),
            describe_keys(&keys.cancel)
        ),
        format!("Default glyph: {}", describe_keys(&keys.mark_default)),
        format!(
            "Save: {}  Quit: {} (does not save)",
            describe_keys(&keys.save),
            describe_keys(&keys.quit)
        ),
        "Committed cells are shaded".to_string(),
    ]
}

/// Builds the frame a host presents.
pub fn frame(extractor: &Extractor, view: &ViewConfig) -> Frame {
    Frame {
        caption: caption(extractor),
        help: if extractor.show_help() {
            help_lines(extractor)
        } else {
            Vec::new()
        },
        overlay: overlay(extractor, view),
    }
}
