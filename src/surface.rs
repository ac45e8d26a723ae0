// src/surface.rs

//! Plain 2D pixel buffers and the blit primitive.
//!
//! The core never talks to a windowing system. Everything it needs from the
//! host is captured by [`GraphicsHost`]: decode an image file into a
//! [`PixelBuffer`], and blit a rectangle of one buffer onto another. The
//! software implementation here is what the extraction tool and the tests
//! use; a game can supply its own host that targets its real surfaces.

use std::path::Path;

use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::color::Rgba;
use crate::error::{FontError, Result};

/// Rectangle in source-image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GlyphRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl GlyphRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// True when the rectangle lies fully inside a `width` x `height` image.
    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.right() <= width as u64 && self.bottom() <= height as u64
    }

    /// Smallest rectangle containing both `self` and `other`.
    pub fn union(&self, other: &GlyphRect) -> GlyphRect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        GlyphRect::new(x, y, (right - x as u64) as u32, (bottom - y as u64) as u32)
    }
}

/// Rectangle on a destination surface. The origin may be negative when
/// right or center alignment pushes text left of the anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DestRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

/// How source pixels are filtered while blitting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BlitStyle {
    /// Source pixels of this color are skipped.
    pub colorkey: Option<Rgba>,
    /// Source pixels matching `.0` are painted as `.1`.
    pub recolor: Option<(Rgba, Rgba)>,
}

/// Row-major RGBA pixel buffer, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    rgba_data: Vec<u8>,
}

impl PixelBuffer {
    /// A fully transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, Rgba::TRANSPARENT)
    }

    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let pixels = width as usize * height as usize;
        let mut rgba_data = Vec::with_capacity(pixels * 4);
        for _ in 0..pixels {
            rgba_data.extend_from_slice(&color.to_bytes());
        }
        Self {
            width,
            height,
            rgba_data,
        }
    }

    /// Wraps raw RGBA bytes. Fails if the length does not match the dimensions.
    pub fn from_rgba(width: u32, height: u32, rgba_data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * 4;
        if rgba_data.len() != expected {
            return Err(FontError::Format(format!(
                "pixel data is {} bytes, expected {} for {}x{}",
                rgba_data.len(),
                expected,
                width,
                height
            )));
        }
        Ok(Self {
            width,
            height,
            rgba_data,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        if x < self.width && y < self.height {
            Some((y as usize * self.width as usize + x as usize) * 4)
        } else {
            None
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let idx = self.index(x, y)?;
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(&self.rgba_data[idx..idx + 4]);
        Some(Rgba::from_bytes(bytes))
    }

    /// Writes one pixel; coordinates outside the buffer are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(idx) = self.index(x, y) {
            self.rgba_data[idx..idx + 4].copy_from_slice(&color.to_bytes());
        }
    }

    /// Blends `color` over every pixel of `rect`, clipped to the buffer.
    pub fn tint_rect(&mut self, rect: GlyphRect, color: Rgba) {
        let right = rect.right().min(self.width as u64) as u32;
        let bottom = rect.bottom().min(self.height as u64) as u32;
        for y in rect.y..bottom {
            for x in rect.x..right {
                if let Some(base) = self.pixel(x, y) {
                    self.set_pixel(x, y, color.over(base));
                }
            }
        }
    }

    /// Copies `src` out of `source` into `dest` on this buffer.
    ///
    /// The source rectangle is scaled to the destination size with
    /// nearest-neighbour sampling. Destination pixels outside the buffer are
    /// clipped; source pixels outside `source` are skipped.
    pub fn blit(&mut self, source: &PixelBuffer, src: GlyphRect, dest: DestRect, style: &BlitStyle) {
        if dest.width == 0 || dest.height == 0 || src.width == 0 || src.height == 0 {
            return;
        }

        for dy in 0..dest.height {
            let ty = dest.y as i64 + dy as i64;
            if ty < 0 {
                continue;
            }
            if ty >= self.height as i64 {
                break;
            }
            let sy = src.y as u64 + (dy as u64 * src.height as u64) / dest.height as u64;

            for dx in 0..dest.width {
                let tx = dest.x as i64 + dx as i64;
                if tx < 0 {
                    continue;
                }
                if tx >= self.width as i64 {
                    break;
                }
                let sx = src.x as u64 + (dx as u64 * src.width as u64) / dest.width as u64;

                let Some(mut px) = source.pixel(sx as u32, sy as u32) else {
                    continue;
                };
                if px.a == 0 {
                    continue;
                }
                if let Some(key) = style.colorkey {
                    if px.same_rgb(&key) {
                        continue;
                    }
                }
                if let Some((from, to)) = style.recolor {
                    if px.same_rgb(&from) {
                        px = Rgba { a: px.a, ..to };
                    }
                }
                self.set_pixel(tx as u32, ty as u32, px);
            }
        }
    }

    /// Writes the buffer as an image file; the format follows the extension.
    pub fn save_png(&self, path: &Path) -> Result<()> {
        debug!("Writing {}x{} image to {}", self.width, self.height, path.display());
        image::save_buffer(
            path,
            &self.rgba_data,
            self.width,
            self.height,
            image::ColorType::Rgba8,
        )
        .map_err(|e| image_error(path, e))
    }
}

fn image_error(path: &Path, err: image::ImageError) -> FontError {
    match err {
        image::ImageError::IoError(source) => FontError::io(path, source),
        other => FontError::Format(format!("image '{}': {}", path.display(), other)),
    }
}

/// Capabilities the core needs from the host graphics layer.
pub trait GraphicsHost {
    /// Decodes an image file into an addressable pixel buffer.
    fn decode_image(&self, path: &Path) -> Result<PixelBuffer>;

    /// Draws `src` of `source` onto `dest` at `dest_rect`.
    fn blit(
        &mut self,
        dest: &mut PixelBuffer,
        source: &PixelBuffer,
        src: GlyphRect,
        dest_rect: DestRect,
        style: &BlitStyle,
    );
}

/// Software host backed by the `image` crate and [`PixelBuffer::blit`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SoftwareHost;

impl GraphicsHost for SoftwareHost {
    fn decode_image(&self, path: &Path) -> Result<PixelBuffer> {
        let decoded = image::open(path).map_err(|e| image_error(path, e))?;
        let rgba = decoded.to_rgba8();
        let (width, height) = rgba.dimensions();
        debug!("Decoded {} ({}x{})", path.display(), width, height);
        PixelBuffer::from_rgba(width, height, rgba.into_raw())
    }

    fn blit(
        &mut self,
        dest: &mut PixelBuffer,
        source: &PixelBuffer,
        src: GlyphRect,
        dest_rect: DestRect,
        style: &BlitStyle,
    ) {
        trace!("blit {:?} -> {:?}", src, dest_rect);
        dest.blit(source, src, dest_rect, style);
    }
}
