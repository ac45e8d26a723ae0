// src/strip.rs

//! Imports single-row glyph strips into a FixedHeight descriptor.
//!
//! In a strip image all glyphs sit side by side in one row. A pixel of the
//! separator color on the first pixel row closes the glyph that started after
//! the previous separator. The caller supplies the character order: each entry
//! names one or more characters that share the same glyph, so `"Aa"` maps both
//! cases to the first glyph.

use std::path::PathBuf;

use log::{debug, info, warn};

use crate::color::Rgba;
use crate::descriptor::FontDescriptor;
use crate::error::{FontError, Result};
use crate::surface::{GlyphRect, PixelBuffer};

/// Builds a FixedHeight descriptor from a separator-delimited strip.
pub fn import_separated_strip(
    image: &PixelBuffer,
    image_path: impl Into<PathBuf>,
    separator: Rgba,
    order: &[String],
) -> Result<FontDescriptor> {
    if order.is_empty() {
        return Err(FontError::Format("character order must not be empty".to_string()));
    }
    if image.height() == 0 {
        return Err(FontError::Format("strip image has no pixel rows".to_string()));
    }

    let mut descriptor =
        FontDescriptor::fixed_height(image_path, image.width(), image.height(), image.height());
    let mut glyph_start = 0u32;
    let mut entries = order.iter();

    for x in 0..image.width() {
        let is_separator = image
            .pixel(x, 0)
            .is_some_and(|px| px.same_rgb(&separator));
        if !is_separator {
            continue;
        }

        let rect = GlyphRect::new(glyph_start, 0, x - glyph_start, image.height());
        glyph_start = x + 1;

        let Some(chars) = entries.next() else {
            warn!("Strip has more glyphs than the character order; ignoring the rest");
            break;
        };
        for ch in chars.chars() {
            descriptor.insert_glyph(ch, rect)?;
        }
        debug!("Strip glyph {:?} -> {:?}", chars, rect);
    }

    let unmatched = entries.count();
    if unmatched > 0 {
        return Err(FontError::Format(format!(
            "character order names {} more glyphs than the strip contains",
            unmatched
        )));
    }

    info!(
        "Imported {} characters from a {}x{} strip",
        descriptor.glyphs.len(),
        image.width(),
        image.height()
    );
    Ok(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::LayoutKind;

    const SEP: Rgba = Rgba::opaque(127, 127, 127);

    /// Builds a strip where glyph `i` is `widths[i]` pixels wide, each
    /// followed by a separator column.
    fn strip(widths: &[u32], height: u32) -> PixelBuffer {
        let total: u32 = widths.iter().map(|w| w + 1).sum();
        let mut img = PixelBuffer::filled(total, height, Rgba::BLACK);
        let mut x = 0;
        for w in widths {
            x += w;
            img.set_pixel(x, 0, SEP);
            x += 1;
        }
        img
    }

    fn order(entries: &[&str]) -> Vec<String> {
        entries.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_import_maps_groups_to_shared_glyphs() {
        let img = strip(&[3, 5, 2], 7);
        let d = import_separated_strip(&img, "strip.png", SEP, &order(&["Aa", "B", " "])).unwrap();

        assert_eq!(d.layout_kind, LayoutKind::FixedHeight);
        assert_eq!(d.cell_height, Some(7));
        assert_eq!(d.glyphs.get('A'), Some(&GlyphRect::new(0, 0, 3, 7)));
        assert_eq!(d.glyphs.get('a'), Some(&GlyphRect::new(0, 0, 3, 7)));
        assert_eq!(d.glyphs.get('B'), Some(&GlyphRect::new(4, 0, 5, 7)));
        assert_eq!(d.glyphs.get(' '), Some(&GlyphRect::new(10, 0, 2, 7)));
        assert_eq!(d.glyphs.first().map(|(c, _)| c), Some('A'));
        assert!(d.validate().is_ok());
    }

    #[test]
    fn test_import_rejects_empty_order() {
        let img = strip(&[3], 4);
        assert!(matches!(
            import_separated_strip(&img, "s.png", SEP, &[]),
            Err(FontError::Format(_))
        ));
    }

    #[test]
    fn test_import_rejects_order_longer_than_strip() {
        let img = strip(&[3, 3], 4);
        assert!(import_separated_strip(&img, "s.png", SEP, &order(&["A", "B", "C"])).is_err());
    }

    #[test]
    fn test_import_ignores_extra_glyphs() {
        let img = strip(&[3, 3, 3], 4);
        let d = import_separated_strip(&img, "s.png", SEP, &order(&["A"])).unwrap();
        assert_eq!(d.glyphs.len(), 1);
    }
}
