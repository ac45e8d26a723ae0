// src/font/tests.rs

use super::*;
use crate::descriptor::LayoutKind;
use crate::surface::{DestRect, GlyphRect};
use std::collections::HashMap;
use std::path::PathBuf;
use test_log::test; // For logging within tests

const INK: Rgba = Rgba::opaque(255, 0, 0);
const KEY: Rgba = Rgba::BLACK;

// --- Fake host ---

/// In-memory host: serves images by path and records every blit.
#[derive(Default)]
struct FakeHost {
    images: HashMap<PathBuf, PixelBuffer>,
    blits: Vec<(GlyphRect, DestRect)>,
}

impl GraphicsHost for FakeHost {
    fn decode_image(&self, path: &Path) -> Result<PixelBuffer> {
        self.images.get(path).cloned().ok_or_else(|| {
            FontError::io(
                path,
                std::io::Error::new(std::io::ErrorKind::NotFound, "no such image"),
            )
        })
    }

    fn blit(
        &mut self,
        dest: &mut PixelBuffer,
        source: &PixelBuffer,
        src: GlyphRect,
        dest_rect: DestRect,
        style: &BlitStyle,
    ) {
        self.blits.push((src, dest_rect));
        dest.blit(source, src, dest_rect, style);
    }
}

/// 32x16 image: four 8x16 glyph slots. Slot 0 is solid ink, slot 1 has a
/// single ink column on its left edge, slots 2-3 are background.
fn font_image() -> PixelBuffer {
    let mut img = PixelBuffer::filled(32, 16, KEY);
    for y in 0..16 {
        for x in 0..8 {
            img.set_pixel(x, y, INK);
        }
        img.set_pixel(8, y, INK);
    }
    img
}

fn fixed_font() -> BitmapFont {
    let mut d = FontDescriptor::fixed_height("font.png", 32, 16, 16);
    d.font_color = Some(INK);
    d.insert_glyph('A', GlyphRect::new(0, 0, 8, 16)).unwrap();
    d.insert_glyph('B', GlyphRect::new(8, 0, 8, 16)).unwrap();
    d.insert_glyph(' ', GlyphRect::new(16, 0, 4, 16)).unwrap();
    BitmapFont::from_parts(d, font_image()).unwrap()
}

fn free_font(with_default: bool) -> BitmapFont {
    let mut d = FontDescriptor::free_dims("font.png", 32, 16);
    d.insert_glyph('a', GlyphRect::new(0, 8, 6, 8)).unwrap();
    d.insert_glyph('T', GlyphRect::new(8, 0, 7, 16)).unwrap();
    if with_default {
        d.set_default_glyph(GlyphRect::new(24, 4, 5, 12)).unwrap();
    }
    BitmapFont::from_parts(d, font_image()).unwrap()
}

// --- Layout ---

#[test]
fn test_advance_is_n_times_width_at_unit_scale() {
    let font = fixed_font();
    let laid_out = font.layout("AAAA", 10, 20, &RenderOptions::default()).unwrap();
    let xs: Vec<i32> = laid_out.blits.iter().map(|b| b.dest.x).collect();
    assert_eq!(xs, vec![10, 18, 26, 34]);
    assert_eq!(laid_out.lines[0].width, 4 * 8);
    assert!(laid_out.blits.iter().all(|b| b.dest.y == 20));
}

#[test]
fn test_measured_width_is_sum_of_advances_with_spacing() {
    let mut font = fixed_font();
    font.descriptor.spacing = 2;
    let opts = RenderOptions::default();
    let metrics = font.metrics("AB A", &opts).unwrap();
    let sum: i32 = metrics.iter().map(|m| m.advance).sum();
    assert_eq!(sum, 10 + 10 + 6 + 10);
    assert_eq!(font.measure("AB A", &opts).unwrap().width, sum as u32);

    let width_a = font.measure("A", &opts).unwrap().width;
    let width_b = font.measure("B", &opts).unwrap().width;
    assert_eq!(font.measure("AB", &opts).unwrap().width, width_a + width_b);
}

#[test]
fn test_scaled_advance_truncates() {
    let mut font = fixed_font();
    font.descriptor.spacing = 1;
    let laid_out = font.layout("AB", 0, 0, &RenderOptions::scaled(1.5)).unwrap();
    // (8 + 1) * 1.5 = 13.5 -> 13; 8 * 1.5 = 12; 16 * 1.5 = 24
    assert_eq!(laid_out.blits[1].dest.x, 13);
    assert_eq!(laid_out.blits[0].dest.width, 12);
    assert_eq!(laid_out.line_height, 24);
    assert_eq!(laid_out.lines[0].width, 26);
}

#[test]
fn test_fixed_height_missing_char_uses_first_glyph() {
    let font = fixed_font();
    let laid_out = font.layout("AšB?", 0, 0, &RenderOptions::default()).unwrap();
    assert_eq!(laid_out.blits.len(), 4);
    assert_eq!(laid_out.blits[1].ch, 'š');
    assert_eq!(laid_out.blits[1].src, GlyphRect::new(0, 0, 8, 16));
    assert_eq!(laid_out.blits[3].src, GlyphRect::new(0, 0, 8, 16));
}

#[test]
fn test_free_dims_missing_char_uses_default_glyph() {
    let font = free_font(true);
    let laid_out = font.layout("a#", 0, 0, &RenderOptions::default()).unwrap();
    assert_eq!(laid_out.blits[1].src, GlyphRect::new(24, 4, 5, 12));
}

#[test]
fn test_free_dims_missing_char_without_default_is_config_error() {
    let font = free_font(false);
    assert!(font.layout("aT", 0, 0, &RenderOptions::default()).is_ok());
    assert!(matches!(
        font.layout("a#", 0, 0, &RenderOptions::default()),
        Err(FontError::Config(_))
    ));
}

#[test]
fn test_empty_fonts_fail_at_render_not_load() {
    let fixed = BitmapFont::from_parts(
        FontDescriptor::fixed_height("font.png", 32, 16, 16),
        font_image(),
    )
    .unwrap();
    assert!(matches!(
        fixed.render("", &RenderOptions::default()),
        Err(FontError::Config(_))
    ));

    let free = BitmapFont::from_parts(FontDescriptor::free_dims("font.png", 32, 16), font_image())
        .unwrap();
    assert!(matches!(
        free.layout("x", 0, 0, &RenderOptions::default()),
        Err(FontError::Config(_))
    ));
}

#[test]
fn test_second_line_starts_one_line_height_below() {
    let font = fixed_font();
    let laid_out = font.layout("AB\nBA", 5, 7, &RenderOptions::default()).unwrap();
    assert_eq!(laid_out.lines.len(), 2);
    let line2 = laid_out.line_blits(1);
    assert!(line2.iter().all(|b| b.dest.y == 7 + 16));
    assert_eq!(line2[0].dest.x, 5);
    let line1_bottom = laid_out
        .line_blits(0)
        .iter()
        .map(|b| b.dest.y + b.dest.height as i32)
        .max()
        .unwrap();
    assert!(line2.iter().all(|b| b.dest.y >= line1_bottom));
}

#[test]
fn test_free_dims_line_height_is_tallest_glyph_in_call() {
    let font = free_font(true);
    let laid_out = font.layout("aa\naT", 0, 0, &RenderOptions::default()).unwrap();
    assert_eq!(laid_out.line_height, 16);
    assert_eq!(laid_out.lines[1].y, 16);

    let short = font.layout("a\na", 0, 0, &RenderOptions::default()).unwrap();
    assert_eq!(short.line_height, 8);
    assert_eq!(short.lines[1].y, 8);
}

#[test]
fn test_line_spacing_adds_to_pitch() {
    let mut font = fixed_font();
    font.descriptor.line_spacing = 3;
    let laid_out = font.layout("A\nA", 0, 0, &RenderOptions::default()).unwrap();
    assert_eq!(laid_out.line_height, 16);
    assert_eq!(laid_out.line_pitch, 19);
    assert_eq!(laid_out.lines[1].y, 19);
}

#[test]
fn test_alignment_offsets_start_x() {
    let font = fixed_font();
    let left = font.layout("AAA", 100, 0, &RenderOptions::default()).unwrap();
    let center = font
        .layout("AAA", 100, 0, &RenderOptions::default().aligned(Align::Center))
        .unwrap();
    let right = font
        .layout("AAA", 100, 0, &RenderOptions::default().aligned(Align::Right))
        .unwrap();
    assert_eq!(left.lines[0].x, 100);
    assert_eq!(center.lines[0].x, 100 - 12);
    assert_eq!(right.lines[0].x, 100 - 24);
    assert_eq!(right.blits[2].dest.x, 100 - 8);
}

#[test]
fn test_empty_text_has_zero_width_and_one_line() {
    let font = fixed_font();
    let extent = font.measure("", &RenderOptions::default()).unwrap();
    assert_eq!(extent, TextExtent { width: 0, height: 16, lines: 1 });
}

#[test]
fn test_crlf_is_one_line_break() {
    let font = fixed_font();
    let extent = font.measure("AB\r\nA", &RenderOptions::default()).unwrap();
    assert_eq!(extent.lines, 2);
    assert_eq!(extent.width, 16);
}

#[test]
fn test_non_positive_scale_is_rejected() {
    let font = fixed_font();
    assert!(font.layout("A", 0, 0, &RenderOptions::scaled(0.0)).is_err());
    assert!(font.layout("A", 0, 0, &RenderOptions::scaled(f32::NAN)).is_err());
}

#[test]
fn test_scale_beyond_pixel_range_is_config_error() {
    let font = fixed_font();
    let huge = RenderOptions::scaled(1e12);
    assert!(matches!(font.layout("A", 0, 0, &huge), Err(FontError::Config(_))));
    assert!(matches!(font.measure("A\nA", &huge), Err(FontError::Config(_))));
    assert!(matches!(font.metrics("A", &huge), Err(FontError::Config(_))));
    // Positions overflow before sizes do.
    let wide = RenderOptions::scaled(1e8);
    assert!(matches!(font.layout("AAAA", 0, 0, &wide), Err(FontError::Config(_))));
}

#[test]
fn test_scale_for_height() {
    let font = fixed_font();
    assert_eq!(font.scale_for_height(32), 2.0);
    let laid_out = font
        .layout("A", 0, 0, &RenderOptions::scaled(font.scale_for_height(32)))
        .unwrap();
    assert_eq!(laid_out.line_height, 32);
}

// --- Rendering ---

#[test]
fn test_render_paints_glyphs_and_keys_out_background() {
    let font = fixed_font();
    let buffer = font.render("AB", &RenderOptions::default()).unwrap();
    assert_eq!((buffer.width(), buffer.height()), (16, 16));
    assert_eq!(buffer.pixel(0, 0), Some(INK));
    assert_eq!(buffer.pixel(7, 15), Some(INK));
    assert_eq!(buffer.pixel(8, 3), Some(INK));
    // Colorkey pixels stay transparent.
    assert_eq!(buffer.pixel(9, 3), Some(Rgba::TRANSPARENT));
}

#[test]
fn test_render_recolors_font_color() {
    let font = fixed_font();
    let blue = Rgba::opaque(0, 0, 255);
    let buffer = font.render("A", &RenderOptions::default().colored(blue)).unwrap();
    assert_eq!(buffer.pixel(3, 3), Some(blue));
}

#[test]
fn test_recolor_without_font_color_is_config_error() {
    let font = free_font(true);
    assert!(matches!(
        font.render("a", &RenderOptions::default().colored(Rgba::opaque(1, 2, 3))),
        Err(FontError::Config(_))
    ));
}

#[test]
fn test_render_right_aligns_lines_inside_block() {
    let font = fixed_font();
    let buffer = font
        .render("AA\nB", &RenderOptions::default().aligned(Align::Right))
        .unwrap();
    assert_eq!((buffer.width(), buffer.height()), (16, 32));
    // 'B' (single ink column) ends at the right edge: ink at x = 8.
    assert_eq!(buffer.pixel(8, 20), Some(INK));
    assert_eq!(buffer.pixel(0, 20), Some(Rgba::TRANSPARENT));
}

#[test]
fn test_render_centers_with_leftover_width_rounded_down() {
    let mut font = fixed_font();
    font.descriptor.spacing = 1;
    let buffer = font
        .render("AA\nA", &RenderOptions::default().aligned(Align::Center))
        .unwrap();
    assert_eq!((buffer.width(), buffer.height()), (18, 32));
    // Second line is 9 px wide in an 18 px block: it starts at x = 4.
    assert_eq!(buffer.pixel(3, 20), Some(Rgba::TRANSPARENT));
    assert_eq!(buffer.pixel(4, 20), Some(INK));
    assert_eq!(buffer.pixel(11, 20), Some(INK));
    assert_eq!(buffer.pixel(12, 20), Some(Rgba::TRANSPARENT));
}

#[test]
fn test_render_lines_one_buffer_per_line() {
    let font = fixed_font();
    let buffers = font.render_lines("AB\nA\n", &RenderOptions::default()).unwrap();
    let sizes: Vec<(u32, u32)> = buffers.iter().map(|b| (b.width(), b.height())).collect();
    assert_eq!(sizes, vec![(16, 16), (8, 16), (0, 16)]);
    assert_eq!(buffers[1].pixel(0, 0), Some(INK));
}

#[test]
fn test_draw_hands_blits_to_host_in_order() {
    let font = fixed_font();
    let mut host = FakeHost::default();
    let mut dest = PixelBuffer::new(64, 64);
    let laid_out = font
        .draw(&mut host, &mut dest, 4, 4, "BA", &RenderOptions::default())
        .unwrap();
    assert_eq!(host.blits.len(), 2);
    assert_eq!(host.blits[0].0, GlyphRect::new(8, 0, 8, 16));
    assert_eq!(host.blits[1].1, laid_out.blits[1].dest);
    assert_eq!(dest.pixel(4, 4), Some(INK));
    assert_eq!(dest.pixel(12, 4), Some(INK));
}

// --- Loading ---

#[test]
fn test_load_resolves_image_next_to_descriptor() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("font.json");
    fixed_font().descriptor().save(&json_path).unwrap();

    let mut host = FakeHost::default();
    host.images.insert(PathBuf::from("font.png"), font_image());
    let font = BitmapFont::load(&json_path, &host).unwrap();
    assert_eq!(font.descriptor().layout_kind, LayoutKind::FixedHeight);
    assert_eq!(font.descriptor().glyphs.len(), 3);
}

#[test]
fn test_load_fails_when_image_missing() {
    let dir = tempfile::tempdir().unwrap();
    let json_path = dir.path().join("font.json");
    fixed_font().descriptor().save(&json_path).unwrap();

    let host = FakeHost::default();
    assert!(matches!(
        BitmapFont::load(&json_path, &host),
        Err(FontError::Io { .. })
    ));
}

#[test]
fn test_from_parts_rejects_glyphs_outside_decoded_image() {
    let d = fixed_font().descriptor().clone();
    let small = PixelBuffer::filled(12, 16, KEY);
    assert!(matches!(
        BitmapFont::from_parts(d, small),
        Err(FontError::Format(_))
    ));
}

#[test]
fn test_from_parts_checks_bounds_when_descriptor_has_no_dims() {
    let json = r#"{
        "layout_kind": "FreeDims",
        "image_path": "font.png",
        "glyphs": { "A": { "x": 28, "y": 0, "width": 8, "height": 8 } }
    }"#;
    let d = FontDescriptor::from_json(json).unwrap();
    assert!(matches!(
        BitmapFont::from_parts(d.clone(), font_image()),
        Err(FontError::Format(_))
    ));
    assert!(BitmapFont::from_parts(d, PixelBuffer::filled(36, 8, KEY)).is_ok());
}
