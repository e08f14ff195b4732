//! Text rasterization with ab_glyph
//!
//! Glyph outlines are rasterized with ab_glyph and blended straight into
//! the tiny-skia pixmap. Without a font the painter still measures (with a
//! rough estimate) so layout stays stable, but draws nothing.

use std::fs;
use std::path::{Path, PathBuf};

use ab_glyph::{Font, FontVec, GlyphId, PxScale, ScaleFont, point};
use tiny_skia::{Color, Pixmap, PremultipliedColorU8};

/// Average advance as a fraction of the pixel size, used without a font
const FALLBACK_ADVANCE: f32 = 0.55;

/// Font loading errors
#[derive(Debug, thiserror::Error)]
pub enum TextError {
    #[error("Failed to read font {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid font data in {path}")]
    InvalidFont { path: PathBuf },
}

/// Measures and draws single-line text
pub struct TextPainter {
    font: Option<FontVec>,
}

impl TextPainter {
    /// Painter that only estimates sizes and draws nothing
    pub fn without_font() -> Self {
        Self { font: None }
    }

    /// Loads a TrueType or OpenType font file
    pub fn from_file(path: &Path) -> Result<Self, TextError> {
        let bytes = fs::read(path).map_err(|source| TextError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let font = FontVec::try_from_vec(bytes).map_err(|_| TextError::InvalidFont {
            path: path.to_path_buf(),
        })?;
        Ok(Self { font: Some(font) })
    }

    /// Loads `path` if given, logging and falling back to no font on failure
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::warn!("No font configured, text will not be drawn");
            return Self::without_font();
        };

        match Self::from_file(path) {
            Ok(painter) => {
                tracing::info!(path = %path.display(), "Font loaded");
                painter
            }
            Err(e) => {
                tracing::warn!("{e}, text will not be drawn");
                Self::without_font()
            }
        }
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// Width and line height of `text` at `px` pixels
    pub fn measure(&self, text: &str, px: f32) -> (f32, f32) {
        match &self.font {
            Some(font) => {
                let scaled = font.as_scaled(PxScale::from(px));
                let mut width = 0.0;
                let mut previous: Option<GlyphId> = None;
                for ch in text.chars() {
                    let id = scaled.glyph_id(ch);
                    if let Some(prev) = previous {
                        width += scaled.kern(prev, id);
                    }
                    width += scaled.h_advance(id);
                    previous = Some(id);
                }
                (width, scaled.ascent() - scaled.descent())
            }
            None => (text.chars().count() as f32 * px * FALLBACK_ADVANCE, px),
        }
    }

    /// Draws `text` with its line box starting at (`x`, `top`)
    pub fn draw(&self, pixmap: &mut Pixmap, text: &str, x: f32, top: f32, px: f32, color: Color) {
        let Some(font) = &self.font else {
            return;
        };

        let scaled = font.as_scaled(PxScale::from(px));
        let baseline = top + scaled.ascent();
        let width = pixmap.width() as i32;
        let height = pixmap.height() as i32;
        let pixels = pixmap.pixels_mut();

        let mut caret = x;
        let mut previous: Option<GlyphId> = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = previous {
                caret += scaled.kern(prev, id);
            }
            let glyph = id.with_scale_and_position(px, point(caret, baseline));
            caret += scaled.h_advance(id);
            previous = Some(id);

            let Some(outlined) = font.outline_glyph(glyph) else {
                continue; // Whitespace has no outline
            };
            let bounds = outlined.px_bounds();
            outlined.draw(|gx, gy, coverage| {
                let px_x = bounds.min.x as i32 + gx as i32;
                let px_y = bounds.min.y as i32 + gy as i32;
                if px_x < 0 || px_y < 0 || px_x >= width || px_y >= height {
                    return;
                }
                let index = (px_y * width + px_x) as usize;
                pixels[index] = blend(pixels[index], color, coverage);
            });
        }
    }
}

/// Source-over blend of `color` at `coverage` onto a premultiplied pixel
fn blend(dst: PremultipliedColorU8, color: Color, coverage: f32) -> PremultipliedColorU8 {
    let src_a = color.alpha() * coverage.clamp(0.0, 1.0);
    let inv = 1.0 - src_a;

    let channel = |src: f32, dst: u8| -> f32 { src * src_a * 255.0 + dst as f32 * inv };

    let a = (src_a * 255.0 + dst.alpha() as f32 * inv).round().clamp(0.0, 255.0) as u8;
    let r = channel(color.red(), dst.red()).round().clamp(0.0, a as f32) as u8;
    let g = channel(color.green(), dst.green()).round().clamp(0.0, a as f32) as u8;
    let b = channel(color.blue(), dst.blue()).round().clamp(0.0, a as f32) as u8;

    PremultipliedColorU8::from_rgba(r, g, b, a).unwrap_or(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_measure_scales_with_length_and_size() {
        let painter = TextPainter::without_font();
        let (short, h_small) = painter.measure("GO", 20.0);
        let (long, _) = painter.measure("GOOD JOB !", 20.0);
        let (_, h_large) = painter.measure("GO", 48.0);

        assert!(long > short);
        assert!(h_large > h_small);
        assert!(!painter.has_font());
    }

    #[test]
    fn drawing_without_font_leaves_pixels() {
        let painter = TextPainter::without_font();
        let mut pixmap = Pixmap::new(40, 20).unwrap();
        pixmap.fill(Color::BLACK);
        let before = pixmap.data().to_vec();

        painter.draw(&mut pixmap, "1", 0.0, 0.0, 16.0, Color::WHITE);
        assert_eq!(pixmap.data(), &before[..]);
    }

    #[test]
    fn missing_font_file_falls_back() {
        let painter = TextPainter::load(Some(Path::new("/no/such/font.ttf")));
        assert!(!painter.has_font());
    }

    #[test]
    fn invalid_font_data_is_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.ttf");
        fs::write(&path, b"not a font").unwrap();

        let result = TextPainter::from_file(&path);
        assert!(matches!(result, Err(TextError::InvalidFont { .. })));
    }

    #[test]
    fn full_coverage_blend_replaces_pixel() {
        let dst = PremultipliedColorU8::from_rgba(0, 0, 0, 255).unwrap();
        let out = blend(dst, Color::WHITE, 1.0);
        assert_eq!((out.red(), out.green(), out.blue(), out.alpha()), (255, 255, 255, 255));
    }

    #[test]
    fn zero_coverage_blend_keeps_pixel() {
        let dst = PremultipliedColorU8::from_rgba(10, 20, 30, 255).unwrap();
        let out = blend(dst, Color::WHITE, 0.0);
        assert_eq!((out.red(), out.green(), out.blue(), out.alpha()), (10, 20, 30, 255));
    }
}
