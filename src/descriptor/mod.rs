// src/descriptor/mod.rs

//! The persisted font description.
//!
//! A `FontDescriptor` is a small JSON document that names the source image
//! and maps every character to a rectangle on it. Two layout kinds exist:
//!
//! - `FixedHeight`: every glyph is `cell_height` tall, widths vary. Missing
//!   characters fall back to the first glyph in the map.
//! - `FreeDims`: every glyph has its own width and height. Missing
//!   characters fall back to the explicit `default_glyph`.
//!
//! ```json
//! {
//!   "family": "moon",
//!   "layout_kind": "FreeDims",
//!   "spacing": 1,
//!   "line_spacing": 0,
//!   "colorkey": "#000000",
//!   "image_path": "charset_moon1.png",
//!   "image_width": 128,
//!   "image_height": 128,
//!   "default_glyph": { "x": 0, "y": 0, "width": 16, "height": 16 },
//!   "glyphs": { "A": { "x": 16, "y": 0, "width": 16, "height": 16 } }
//! }
//! ```
//!
//! `image_width` and `image_height` may be omitted; glyph bounds are then
//! checked once the image is decoded.
//!
//! `//` line comments are accepted on load and never written on save.

mod glyph_map;

pub use glyph_map::GlyphMap;

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{FontError, Result};
use crate::surface::GlyphRect;

/// The two supported font layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutKind {
    FixedHeight,
    FreeDims,
}

fn default_colorkey() -> Rgba {
    Rgba::BLACK
}

/// The persisted unit: glyph rectangles plus global font metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontDescriptor {
    /// Font family name.
    #[serde(default)]
    pub family: String,
    pub layout_kind: LayoutKind,
    /// Shared glyph height; required for `FixedHeight`, ignored otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_height: Option<u32>,
    /// Horizontal gap added after every glyph, in source pixels.
    #[serde(default)]
    pub spacing: i32,
    /// Vertical gap added between lines, in source pixels.
    #[serde(default)]
    pub line_spacing: i32,
    /// Background color of the source image; treated as transparent.
    #[serde(default = "default_colorkey")]
    pub colorkey: Rgba,
    /// Ink color of the source image, required for recoloring.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_color: Option<Rgba>,
    pub image_path: PathBuf,
    /// Size of the source image. Optional on load; when present, glyph
    /// rectangles are checked against it before the image is decoded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,
    #[serde(default)]
    pub default_glyph: Option<GlyphRect>,
    pub glyphs: GlyphMap,
}

impl FontDescriptor {
    /// An empty FreeDims descriptor over an image of the given size.
    pub fn free_dims(image_path: impl Into<PathBuf>, image_width: u32, image_height: u32) -> Self {
        Self::empty(LayoutKind::FreeDims, None, image_path.into(), image_width, image_height)
    }

    /// An empty FixedHeight descriptor over an image of the given size.
    pub fn fixed_height(
        image_path: impl Into<PathBuf>,
        image_width: u32,
        image_height: u32,
        cell_height: u32,
    ) -> Self {
        Self::empty(
            LayoutKind::FixedHeight,
            Some(cell_height),
            image_path.into(),
            image_width,
            image_height,
        )
    }

    fn empty(
        layout_kind: LayoutKind,
        cell_height: Option<u32>,
        image_path: PathBuf,
        image_width: u32,
        image_height: u32,
    ) -> Self {
        FontDescriptor {
            family: String::new(),
            layout_kind,
            cell_height,
            spacing: 0,
            line_spacing: 0,
            colorkey: default_colorkey(),
            font_color: None,
            image_path,
            image_width: Some(image_width),
            image_height: Some(image_height),
            default_glyph: None,
            glyphs: GlyphMap::new(),
        }
    }

    /// Reads and validates a descriptor from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| FontError::io(path, e))?;
        let descriptor = Self::from_json(&text)?;
        info!(
            "Loaded {:?} font descriptor '{}' with {} glyphs",
            descriptor.layout_kind,
            path.display(),
            descriptor.glyphs.len()
        );
        Ok(descriptor)
    }

    /// Parses and validates a descriptor from JSON text.
    pub fn from_json(text: &str) -> Result<Self> {
        let cleaned = strip_line_comments(text);
        let descriptor: FontDescriptor = serde_json::from_str(&cleaned)
            .map_err(|e| FontError::Format(e.to_string()))?;
        descriptor.validate()?;
        Ok(descriptor)
    }

    /// Serializes deterministically: fixed field order, glyphs in map order,
    /// pretty printed with a trailing newline.
    pub fn to_json(&self) -> Result<String> {
        let mut text =
            serde_json::to_string_pretty(self).map_err(|e| FontError::Format(e.to_string()))?;
        text.push('\n');
        Ok(text)
    }

    /// Writes the descriptor to disk.
    pub fn save(&self, path: &Path) -> Result<()> {
        let text = self.to_json()?;
        fs::write(path, text).map_err(|e| FontError::io(path, e))?;
        info!(
            "Saved font descriptor with {} glyphs to '{}'",
            self.glyphs.len(),
            path.display()
        );
        Ok(())
    }

    /// Checks every schema invariant.
    pub fn validate(&self) -> Result<()> {
        if self.layout_kind == LayoutKind::FixedHeight {
            match self.cell_height {
                None => {
                    return Err(FontError::Format(
                        "FixedHeight layout requires 'cell_height'".to_string(),
                    ))
                }
                Some(0) => {
                    return Err(FontError::Format("'cell_height' must be positive".to_string()))
                }
                Some(_) => {}
            }
        }
        for (ch, rect) in self.glyphs.iter() {
            self.check_rect(Some(ch), rect)?;
        }
        if let Some(rect) = &self.default_glyph {
            self.check_bounds("default glyph", rect)?;
        }
        if self.font_color.is_some_and(|c| c.same_rgb(&self.colorkey)) {
            return Err(FontError::Format(format!(
                "font_color {} is the same as the colorkey",
                self.colorkey
            )));
        }
        Ok(())
    }

    fn check_rect(&self, ch: Option<char>, rect: &GlyphRect) -> Result<()> {
        let what = match ch {
            Some(ch) => format!("glyph '{}'", ch.escape_default()),
            None => "glyph".to_string(),
        };
        self.check_bounds(&what, rect)?;
        if let (LayoutKind::FixedHeight, Some(cell_height)) = (self.layout_kind, self.cell_height) {
            if rect.height != cell_height {
                return Err(FontError::Format(format!(
                    "{} is {} px tall but cell_height is {}",
                    what, rect.height, cell_height
                )));
            }
        }
        Ok(())
    }

    fn check_bounds(&self, what: &str, rect: &GlyphRect) -> Result<()> {
        let (Some(width), Some(height)) = (self.image_width, self.image_height) else {
            return Ok(());
        };
        if !rect.fits_within(width, height) {
            return Err(FontError::Format(format!(
                "{} {:?} lies outside the {}x{} image",
                what, rect, width, height
            )));
        }
        Ok(())
    }

    /// Adds or replaces a glyph (last write wins). Returns the replaced rectangle.
    pub fn insert_glyph(&mut self, ch: char, rect: GlyphRect) -> Result<Option<GlyphRect>> {
        self.check_rect(Some(ch), &rect)?;
        let previous = self.glyphs.insert(ch, rect);
        debug!("Glyph '{}' -> {:?} (replaced: {:?})", ch.escape_default(), rect, previous);
        Ok(previous)
    }

    /// Sets the FreeDims placeholder glyph.
    pub fn set_default_glyph(&mut self, rect: GlyphRect) -> Result<()> {
        self.check_bounds("default glyph", &rect)?;
        self.default_glyph = Some(rect);
        Ok(())
    }

    /// Unscaled line height: `cell_height` for FixedHeight, the tallest glyph
    /// (or the default glyph if there are none) for FreeDims.
    pub fn font_height(&self) -> u32 {
        match self.layout_kind {
            LayoutKind::FixedHeight => self.cell_height.unwrap_or(0),
            LayoutKind::FreeDims => self
                .glyphs
                .values()
                .map(|r| r.height)
                .max()
                .or(self.default_glyph.map(|r| r.height))
                .unwrap_or(0),
        }
    }

    /// Fails with `Config` when the font can never produce a glyph.
    pub fn ensure_renderable(&self) -> Result<()> {
        match self.layout_kind {
            LayoutKind::FixedHeight if self.glyphs.is_empty() => Err(FontError::Config(
                "FixedHeight font has no glyphs to fall back to".to_string(),
            )),
            LayoutKind::FreeDims if self.glyphs.is_empty() && self.default_glyph.is_none() => {
                Err(FontError::Config(
                    "FreeDims font has no glyphs and no default_glyph".to_string(),
                ))
            }
            _ => Ok(()),
        }
    }

    /// The stand-in for characters missing from `glyphs`.
    pub fn fallback_glyph(&self) -> Result<GlyphRect> {
        match self.layout_kind {
            LayoutKind::FixedHeight => self.glyphs.first().map(|(_, rect)| rect).ok_or_else(|| {
                FontError::Config("FixedHeight font has no glyphs to fall back to".to_string())
            }),
            LayoutKind::FreeDims => self.default_glyph.ok_or_else(|| {
                FontError::Config("FreeDims font has no default_glyph".to_string())
            }),
        }
    }

    /// Resolves a character to its rectangle, applying the fallback policy.
    pub fn resolve(&self, ch: char) -> Result<GlyphRect> {
        match self.glyphs.get(ch) {
            Some(rect) => Ok(*rect),
            None => self.fallback_glyph(),
        }
    }

    /// Where the source image lives: next to the descriptor if such a file
    /// exists, otherwise `image_path` as given (relative to the working dir).
    pub fn resolve_image_path(&self, descriptor_path: &Path) -> PathBuf {
        if self.image_path.is_absolute() {
            return self.image_path.clone();
        }
        if let Some(dir) = descriptor_path.parent() {
            let candidate = dir.join(&self.image_path);
            if candidate.is_file() {
                return candidate;
            }
        }
        self.image_path.clone()
    }
}

/// Removes `//` comments that start outside string literals.
pub(crate) fn strip_line_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for line in text.lines() {
        let mut in_string = false;
        let mut escaped = false;
        let mut cut = line.len();
        let bytes = line.as_bytes();
        for (i, &b) in bytes.iter().enumerate() {
            if in_string {
                match b {
                    _ if escaped => escaped = false,
                    b'\\' => escaped = true,
                    b'"' => in_string = false,
                    _ => {}
                }
            } else if b == b'"' {
                in_string = true;
            } else if b == b'/' && bytes.get(i + 1) == Some(&b'/') {
                cut = i;
                break;
            }
        }
        out.push_str(&line[..cut]);
        out.push('\n');
    }
    out
}
