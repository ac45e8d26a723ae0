// src/lib.rs

//! Bitmap fonts from pre-baked glyph atlases.
//!
//! A font is a source image plus a JSON [`FontDescriptor`] mapping characters
//! to rectangles on it. [`BitmapFont`] lays out and draws text from such a
//! pair; the [`extractor`] module is the interactive tool that builds
//! descriptors by assigning characters to grid cells.

pub mod color;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod extractor;
pub mod font;
pub mod grid;
pub mod keys;
pub mod platform;
pub mod strip;
pub mod surface;

pub use color::Rgba;
pub use descriptor::{FontDescriptor, GlyphMap, LayoutKind};
pub use error::{FontError, Result};
pub use font::{Align, BitmapFont, RenderOptions, TextExtent, TextLayout};
pub use grid::{GlyphCell, GlyphGrid};
pub use surface::{BlitStyle, DestRect, GlyphRect, GraphicsHost, PixelBuffer, SoftwareHost};
