// src/font/layout.rs

//! The layout pass: turns text into positioned blits.
//!
//! Layout is measure-then-place. The measure step resolves every character
//! to a glyph rectangle (applying the fallback policy) and sums the advances
//! of each line; the place step walks the pen across each line starting from
//! an alignment-adjusted x. Nothing here touches pixels.

use log::trace;

use crate::descriptor::{FontDescriptor, LayoutKind};
use crate::error::{FontError, Result};
use crate::surface::{DestRect, GlyphRect};

/// Horizontal alignment of each line relative to the requested x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Align {
    /// Lines start at x.
    #[default]
    Left,
    /// Lines are centered on x.
    Center,
    /// Lines end at x.
    Right,
}

/// One glyph copy: `src` on the font image goes to `dest` on the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Blit {
    /// The character this blit stands for (before fallback substitution).
    pub ch: char,
    pub src: GlyphRect,
    pub dest: DestRect,
}

/// Position and size of one laid-out line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineExtent {
    /// Pen x where the line starts, after alignment.
    pub x: i32,
    pub y: i32,
    /// Sum of all glyph advances on the line.
    pub width: u32,
    /// Index range of this line's glyphs in [`TextLayout::blits`].
    pub first_blit: usize,
    pub blit_count: usize,
}

/// The result of laying out a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextLayout {
    /// Paint order: later entries are drawn over earlier ones.
    pub blits: Vec<Blit>,
    pub lines: Vec<LineExtent>,
    /// Scaled glyph height shared by every line of this call.
    pub line_height: u32,
    /// Vertical distance between consecutive line origins.
    pub line_pitch: u32,
}

impl TextLayout {
    /// Width of the widest line.
    pub fn width(&self) -> u32 {
        self.lines.iter().map(|l| l.width).max().unwrap_or(0)
    }

    /// Total height: one pitch per line.
    pub fn height(&self) -> u32 {
        self.line_pitch * self.lines.len() as u32
    }

    /// Blits belonging to line `index`.
    pub fn line_blits(&self, index: usize) -> &[Blit] {
        match self.lines.get(index) {
            Some(line) => &self.blits[line.first_blit..line.first_blit + line.blit_count],
            None => &[],
        }
    }
}

pub(crate) struct ResolvedLine {
    pub glyphs: Vec<(char, GlyphRect)>,
    pub advance: i64,
}

/// Truncates toward zero, the rounding rule for every scaled quantity.
pub(crate) fn scaled(value: i64, scale: f32) -> i64 {
    (value as f64 * scale as f64).trunc() as i64
}

pub(crate) fn check_scale(scale: f32) -> Result<()> {
    if scale.is_finite() && scale > 0.0 {
        Ok(())
    } else {
        Err(FontError::Config(format!("scale must be positive, got {}", scale)))
    }
}

/// Pen advance for one glyph: `(width + spacing) * scale`, truncated.
pub(crate) fn advance(descriptor: &FontDescriptor, rect: &GlyphRect, scale: f32) -> i64 {
    scaled(rect.width as i64 + descriptor.spacing as i64, scale)
}

/// Splits on line breaks, tolerating `\r\n`.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split('\n').map(|line| line.strip_suffix('\r').unwrap_or(line))
}

/// Measure step: resolve characters, sum advances.
pub(crate) fn resolve_lines(
    descriptor: &FontDescriptor,
    text: &str,
    scale: f32,
) -> Result<Vec<ResolvedLine>> {
    descriptor.ensure_renderable()?;
    check_scale(scale)?;

    split_lines(text)
        .map(|line| -> Result<ResolvedLine> {
            let mut glyphs = Vec::with_capacity(line.len());
            let mut total = 0i64;
            for ch in line.chars() {
                let rect = match descriptor.glyphs.get(ch) {
                    Some(rect) => *rect,
                    None => {
                        trace!("'{}' not in font, using fallback glyph", ch.escape_default());
                        descriptor.fallback_glyph()?
                    }
                };
                total = total.saturating_add(advance(descriptor, &rect, scale));
                glyphs.push((ch, rect));
            }
            Ok(ResolvedLine {
                glyphs,
                advance: total,
            })
        })
        .collect()
}

/// Unscaled line height for one call: `cell_height` for FixedHeight, the
/// tallest glyph resolved anywhere in the call for FreeDims.
pub(crate) fn base_line_height(descriptor: &FontDescriptor, lines: &[ResolvedLine]) -> u32 {
    match descriptor.layout_kind {
        LayoutKind::FixedHeight => descriptor.font_height(),
        LayoutKind::FreeDims => lines
            .iter()
            .flat_map(|l| l.glyphs.iter().map(|(_, r)| r.height))
            .max()
            .unwrap_or_else(|| descriptor.font_height()),
    }
}

fn out_of_range(scale: f32) -> FontError {
    FontError::Config(format!("scale {} puts the layout outside 32-bit pixel range", scale))
}

/// A scaled size in pixels; negative sizes collapse to zero.
pub(crate) fn to_px(value: i64, scale: f32) -> Result<u32> {
    u32::try_from(value.max(0)).map_err(|_| out_of_range(scale))
}

pub(crate) fn to_coord(value: i64, scale: f32) -> Result<i32> {
    i32::try_from(value).map_err(|_| out_of_range(scale))
}

fn align_offset(align: Align, width: i64) -> i64 {
    match align {
        Align::Left => 0,
        Align::Center => -(width / 2),
        Align::Right => -width,
    }
}

/// Full layout of `text` with the pen starting at `(x, y)`.
pub fn layout_text(
    descriptor: &FontDescriptor,
    text: &str,
    x: i32,
    y: i32,
    scale: f32,
    align: Align,
) -> Result<TextLayout> {
    let lines = resolve_lines(descriptor, text, scale)?;
    let base = base_line_height(descriptor, &lines);
    let line_height = to_px(scaled(base as i64, scale), scale)?;
    let line_pitch = to_px(scaled(base as i64 + descriptor.line_spacing as i64, scale), scale)?;
    if (line_pitch as u64).saturating_mul(lines.len() as u64) > u32::MAX as u64 {
        return Err(out_of_range(scale));
    }

    let mut blits = Vec::with_capacity(lines.iter().map(|l| l.glyphs.len()).sum());
    let mut extents = Vec::with_capacity(lines.len());

    for (index, line) in lines.iter().enumerate() {
        let line_y = y as i64 + index as i64 * line_pitch as i64;
        let start_x = x as i64 + align_offset(align, line.advance);
        let first_blit = blits.len();
        let mut pen = start_x;

        for (ch, rect) in &line.glyphs {
            let dest = DestRect {
                x: to_coord(pen, scale)?,
                y: to_coord(line_y, scale)?,
                width: to_px(scaled(rect.width as i64, scale), scale)?,
                height: to_px(scaled(rect.height as i64, scale), scale)?,
            };
            blits.push(Blit {
                ch: *ch,
                src: *rect,
                dest,
            });
            pen = pen.saturating_add(advance(descriptor, rect, scale));
        }

        extents.push(LineExtent {
            x: to_coord(start_x, scale)?,
            y: to_coord(line_y, scale)?,
            width: to_px(line.advance, scale)?,
            first_blit,
            blit_count: blits.len() - first_blit,
        });
    }

    trace!(
        "Laid out {} blits over {} lines (line height {}, pitch {})",
        blits.len(),
        extents.len(),
        line_height,
        line_pitch
    );

    Ok(TextLayout {
        blits,
        lines: extents,
        line_height,
        line_pitch,
    })
}
