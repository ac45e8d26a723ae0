// src/font/mod.rs

//! Runtime bitmap font: a loaded descriptor plus its decoded source image.
//!
//! `BitmapFont` never fails on missing characters; every position renders
//! either its own glyph or the layout kind's fallback glyph. Rendering fails
//! with `FontError::Config` only when no fallback exists at all.

mod layout;
#[cfg(test)]
mod tests;

pub use layout::{layout_text, Align, Blit, LineExtent, TextLayout};

use std::path::Path;

use log::{debug, info, warn};

use crate::color::Rgba;
use crate::descriptor::FontDescriptor;
use crate::error::{FontError, Result};
use crate::surface::{BlitStyle, GraphicsHost, PixelBuffer};

/// Per-call rendering parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    /// Uniform scale applied to glyph sizes and advances (truncated).
    pub scale: f32,
    pub align: Align,
    /// Repaint pixels of the descriptor's `font_color` in this color.
    pub color: Option<Rgba>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            scale: 1.0,
            align: Align::Left,
            color: None,
        }
    }
}

impl RenderOptions {
    pub fn scaled(scale: f32) -> Self {
        RenderOptions {
            scale,
            ..Self::default()
        }
    }

    pub fn aligned(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn colored(mut self, color: Rgba) -> Self {
        self.color = Some(color);
        self
    }
}

/// Overall size of a block of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextExtent {
    pub width: u32,
    pub height: u32,
    pub lines: usize,
}

/// Advance and line height of one character position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlyphMetrics {
    pub ch: char,
    pub advance: i32,
    pub line_height: u32,
}

/// A font ready to lay out and draw text.
#[derive(Debug, Clone)]
pub struct BitmapFont {
    descriptor: FontDescriptor,
    image: PixelBuffer,
}

impl BitmapFont {
    /// Loads a descriptor and decodes its image through `host`.
    ///
    /// Either both succeed and every glyph fits the decoded image, or an
    /// error is returned and no font exists.
    pub fn load<H: GraphicsHost + ?Sized>(path: &Path, host: &H) -> Result<Self> {
        let descriptor = FontDescriptor::load(path)?;
        let image_path = descriptor.resolve_image_path(path);
        debug!("Font image for '{}' resolved to '{}'", path.display(), image_path.display());
        let image = host.decode_image(&image_path)?;
        let font = Self::from_parts(descriptor, image)?;
        info!("Bitmap font '{}' ready", path.display());
        Ok(font)
    }

    /// Pairs a descriptor with an already decoded image.
    pub fn from_parts(descriptor: FontDescriptor, image: PixelBuffer) -> Result<Self> {
        descriptor.validate()?;
        if let (Some(width), Some(height)) = (descriptor.image_width, descriptor.image_height) {
            if (image.width(), image.height()) != (width, height) {
                warn!(
                    "Descriptor expects a {}x{} image but '{}' is {}x{}",
                    width,
                    height,
                    descriptor.image_path.display(),
                    image.width(),
                    image.height()
                );
            }
        }
        let outside = descriptor
            .glyphs
            .iter()
            .map(|(ch, rect)| (Some(ch), rect))
            .chain(descriptor.default_glyph.iter().map(|rect| (None, rect)))
            .find(|(_, rect)| !rect.fits_within(image.width(), image.height()));
        if let Some((ch, rect)) = outside {
            return Err(FontError::Format(format!(
                "glyph {:?} {:?} lies outside the {}x{} font image",
                ch,
                rect,
                image.width(),
                image.height()
            )));
        }
        Ok(BitmapFont { descriptor, image })
    }

    pub fn descriptor(&self) -> &FontDescriptor {
        &self.descriptor
    }

    pub fn image(&self) -> &PixelBuffer {
        &self.image
    }

    /// Unscaled line height of the font.
    pub fn font_height(&self) -> u32 {
        self.descriptor.font_height()
    }

    /// Scale factor that renders lines `px` pixels tall.
    pub fn scale_for_height(&self, px: u32) -> f32 {
        match self.font_height() {
            0 => 1.0,
            h => px as f32 / h as f32,
        }
    }

    /// Lays out `text` with the pen starting at `(x, y)`.
    pub fn layout(&self, text: &str, x: i32, y: i32, opts: &RenderOptions) -> Result<TextLayout> {
        layout_text(&self.descriptor, text, x, y, opts.scale, opts.align)
    }

    /// Size of the block `render` would produce.
    pub fn measure(&self, text: &str, opts: &RenderOptions) -> Result<TextExtent> {
        let laid_out = self.layout(text, 0, 0, opts)?;
        Ok(TextExtent {
            width: laid_out.width(),
            height: laid_out.height(),
            lines: laid_out.lines.len(),
        })
    }

    /// Advance and line height for every character (line breaks excluded).
    pub fn metrics(&self, text: &str, opts: &RenderOptions) -> Result<Vec<GlyphMetrics>> {
        let lines = layout::resolve_lines(&self.descriptor, text, opts.scale)?;
        let base = layout::base_line_height(&self.descriptor, &lines);
        let line_height = layout::to_px(
            layout::scaled(base as i64 + self.descriptor.line_spacing as i64, opts.scale),
            opts.scale,
        )?;
        lines
            .iter()
            .flat_map(|line| line.glyphs.iter())
            .map(|(ch, rect)| {
                Ok(GlyphMetrics {
                    ch: *ch,
                    advance: layout::to_coord(
                        layout::advance(&self.descriptor, rect, opts.scale),
                        opts.scale,
                    )?,
                    line_height,
                })
            })
            .collect()
    }

    fn blit_style(&self, opts: &RenderOptions) -> Result<BlitStyle> {
        let recolor = match opts.color {
            None => None,
            Some(color) => {
                let from = self.descriptor.font_color.ok_or_else(|| {
                    FontError::Config("recoloring requires 'font_color' in the descriptor".to_string())
                })?;
                Some((from, color))
            }
        };
        Ok(BlitStyle {
            colorkey: Some(self.descriptor.colorkey),
            recolor,
        })
    }

    /// Lays out `text` at `(x, y)` and hands every blit to the host, in order.
    pub fn draw<H: GraphicsHost + ?Sized>(
        &self,
        host: &mut H,
        dest: &mut PixelBuffer,
        x: i32,
        y: i32,
        text: &str,
        opts: &RenderOptions,
    ) -> Result<TextLayout> {
        let style = self.blit_style(opts)?;
        let laid_out = self.layout(text, x, y, opts)?;
        for blit in &laid_out.blits {
            host.blit(dest, &self.image, blit.src, blit.dest, &style);
        }
        Ok(laid_out)
    }

    /// Renders `text` into a new transparent buffer sized to fit it.
    ///
    /// Lines are aligned inside the block: left-aligned lines start at 0,
    /// right-aligned lines end at the block's right edge, centered lines
    /// start at half the leftover width, rounded down.
    pub fn render(&self, text: &str, opts: &RenderOptions) -> Result<PixelBuffer> {
        let style = self.blit_style(opts)?;
        let extent = self.measure(text, opts)?;
        let laid_out = self.layout(text, 0, 0, &opts.aligned(Align::Left))?;
        let mut buffer = PixelBuffer::new(extent.width, extent.height);
        for (index, line) in laid_out.lines.iter().enumerate() {
            let slack = extent.width.saturating_sub(line.width);
            let offset = match opts.align {
                Align::Left => 0,
                Align::Center => slack / 2,
                Align::Right => slack,
            } as i32;
            for blit in laid_out.line_blits(index) {
                let mut dest = blit.dest;
                dest.x += offset;
                buffer.blit(&self.image, blit.src, dest, &style);
            }
        }
        Ok(buffer)
    }

    /// Renders each line of `text` into its own buffer.
    pub fn render_lines(&self, text: &str, opts: &RenderOptions) -> Result<Vec<PixelBuffer>> {
        let style = self.blit_style(opts)?;
        let laid_out = self.layout(text, 0, 0, &opts.aligned(Align::Left))?;
        let buffers = laid_out
            .lines
            .iter()
            .enumerate()
            .map(|(index, line)| {
                let mut buffer = PixelBuffer::new(line.width, laid_out.line_height);
                for blit in laid_out.line_blits(index) {
                    let mut dest = blit.dest;
                    dest.y -= line.y;
                    buffer.blit(&self.image, blit.src, dest, &style);
                }
                buffer
            })
            .collect();
        Ok(buffers)
    }
}
