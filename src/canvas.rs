//! Raster canvas for chart rendering
//!
//! Thin layer over an `image::RgbImage`: line and rectangle primitives come
//! from `imageproc`, text is drawn from the 8x8 `font8x8` bitmap glyphs so
//! rendering never depends on fonts installed on the host.

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageResult, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_line_segment_mut};
use imageproc::rect::Rect;
use std::path::Path;

/// Glyph cell size in pixels before scaling
pub const GLYPH_SIZE: u32 = 8;

pub const WHITE: Rgb<u8> = Rgb([255, 255, 255]);
pub const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
pub const GRID_GREY: Rgb<u8> = Rgb([210, 210, 210]);

/// Horizontal text alignment relative to the anchor x coordinate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Left,
    Center,
    Right,
}

/// Fixed-size white RGB drawing surface
#[derive(Debug, Clone)]
pub struct Canvas {
    image: RgbImage,
}

impl Canvas {
    /// Create a white canvas of `width` x `height` pixels
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbImage::from_pixel(width, height, WHITE),
        }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Pixel color, or None when out of bounds
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb<u8>> {
        if x < self.width() && y < self.height() {
            Some(*self.image.get_pixel(x, y))
        } else {
            None
        }
    }

    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        draw_line_segment_mut(&mut self.image, from, to, color);
    }

    /// Two-pixel thick line, used for data series
    pub fn thick_line(&mut self, from: (f32, f32), to: (f32, f32), color: Rgb<u8>) {
        self.line(from, to, color);
        if (to.0 - from.0).abs() >= (to.1 - from.1).abs() {
            self.line((from.0, from.1 + 1.0), (to.0, to.1 + 1.0), color);
        } else {
            self.line((from.0 + 1.0, from.1), (to.0 + 1.0, to.1), color);
        }
    }

    pub fn rect_outline(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_hollow_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), color);
    }

    pub fn fill_rect(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgb<u8>) {
        if width == 0 || height == 0 {
            return;
        }
        draw_filled_rect_mut(&mut self.image, Rect::at(x, y).of_size(width, height), color);
    }

    /// Width in pixels of `text` drawn at `scale`
    pub fn text_width(text: &str, scale: u32) -> u32 {
        text.chars().count() as u32 * GLYPH_SIZE * scale
    }

    /// Draw horizontal text with its top edge at `y`
    ///
    /// Characters without a glyph in the basic Latin table are left blank.
    pub fn text(&mut self, x: i32, y: i32, text: &str, scale: u32, anchor: Anchor, color: Rgb<u8>) {
        let width = Self::text_width(text, scale) as i32;
        let left = match anchor {
            Anchor::Left => x,
            Anchor::Center => x - width / 2,
            Anchor::Right => x - width,
        };
        let cell = (GLYPH_SIZE * scale) as i32;

        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let origin_x = left + i as i32 * cell;
            for (row, bits) in glyph.iter().copied().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) != 0 {
                        self.fill_rect(
                            origin_x + (col * scale) as i32,
                            y + (row as u32 * scale) as i32,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Draw text rotated 90 degrees counter-clockwise, centered on `center_y`
    ///
    /// The text reads bottom to top with its left edge at `x`.
    pub fn text_vertical(&mut self, x: i32, center_y: i32, text: &str, scale: u32, color: Rgb<u8>) {
        let length = Self::text_width(text, scale) as i32;
        let bottom = center_y + length / 2;
        let cell = (GLYPH_SIZE * scale) as i32;

        for (i, ch) in text.chars().enumerate() {
            let Some(glyph) = BASIC_FONTS.get(ch) else {
                continue;
            };
            let along = i as i32 * cell;
            for (row, bits) in glyph.iter().copied().enumerate() {
                for col in 0..GLYPH_SIZE {
                    if bits & (1 << col) != 0 {
                        let s = scale as i32;
                        self.fill_rect(
                            x + row as i32 * s,
                            bottom - along - (col as i32 + 1) * s,
                            scale,
                            scale,
                            color,
                        );
                    }
                }
            }
        }
    }

    /// Encode the canvas to `path`; format follows the file extension
    pub fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.image.save(path)
    }
}

/// Tick positions covering `[lo, hi]` with at most `max_bins` intervals
///
/// Steps are 1, 2, 2.5 or 5 times a power of ten. Degenerate ranges return
/// the single value `lo`.
pub fn nice_ticks(lo: f64, hi: f64, max_bins: usize) -> Vec<f64> {
    if !(hi > lo) || max_bins == 0 || !lo.is_finite() || !hi.is_finite() {
        return vec![lo];
    }

    let raw_step = (hi - lo) / max_bins as f64;
    let magnitude = 10f64.powf(raw_step.log10().floor());
    let step = [1.0, 2.0, 2.5, 5.0, 10.0]
        .iter()
        .map(|m| m * magnitude)
        .find(|s| *s >= raw_step * (1.0 - 1e-9))
        .unwrap_or(10.0 * magnitude);

    let first = (lo / step).ceil();
    let last = (hi / step + 1e-9).floor();
    let count = (last - first).max(0.0) as usize;

    (0..=count).map(|i| (first + i as f64) * step).collect()
}

/// Compact tick label: integers without decimals, large values in exponent
/// form with trailing mantissa zeros dropped ("1e12", "2.5e12")
pub fn format_tick(value: f64) -> String {
    let magnitude = value.abs();
    if magnitude >= 1e6 {
        let text = format!("{:.2e}", value);
        match text.split_once('e') {
            Some((mantissa, exponent)) if mantissa.contains('.') => {
                let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
                format!("{}e{}", mantissa, exponent)
            }
            _ => text,
        }
    } else if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        let text = format!("{:.3}", value);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    }
}
