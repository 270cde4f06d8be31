//! Social preview image (`og:image`).
//!
//! A fixed composition, laid out for a 1200×630 reference canvas and scaled
//! to the configured size:
//!
//! | Element | Position (reference) |
//! |---|---|
//! | Translucent accent ellipse | box (770, -120)–(1460, 570), 2px outline |
//! | Wordmark, two colours | centred, top at y=205, 118px bold |
//! | Monogram, translucent | top-left (890, 55), 260px bold |
//! | Tagline, muted | centred, top at y=360, 42px regular |
//!
//! Fonts are the first loadable file of each candidate list. Without a font
//! the text is skipped and only the shapes are drawn.

use crate::config::OgImageConfig;
use ab_glyph::{Font, FontVec, PxScale, ScaleFont, point};
use image::{ImageFormat, Rgb, RgbImage};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

const REF_WIDTH: f32 = 1200.0;
const REF_HEIGHT: f32 = 630.0;

const ELLIPSE: (f32, f32, f32, f32) = (770.0, -120.0, 1460.0, 570.0);
const ELLIPSE_FILL_ALPHA: u8 = 34;
const ELLIPSE_OUTLINE_ALPHA: u8 = 48;
const ELLIPSE_OUTLINE_WIDTH: f32 = 2.0;

const BRAND_SIZE: f32 = 118.0;
const BRAND_TOP: f32 = 205.0;
const MONOGRAM_SIZE: f32 = 260.0;
const MONOGRAM_POS: (f32, f32) = (890.0, 55.0);
const MONOGRAM_ALPHA: u8 = 58;
const TAGLINE_SIZE: f32 = 42.0;
const TAGLINE_GAP: f32 = 155.0;

#[derive(Error, Debug)]
pub enum OgImageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

/// Fonts used by the composition; either may be missing.
#[derive(Default)]
pub struct Fonts {
    pub bold: Option<FontVec>,
    pub regular: Option<FontVec>,
}

impl Fonts {
    pub fn load(config: &OgImageConfig) -> Self {
        let fonts = Self {
            bold: load_font(&config.bold_fonts),
            regular: load_font(&config.regular_fonts),
        };
        if fonts.bold.is_none() && fonts.regular.is_none() {
            log::warn!("No usable font found; preview image will have no text");
        }
        fonts
    }
}

/// First candidate path that reads and parses as a font.
pub fn load_font(candidates: &[String]) -> Option<FontVec> {
    candidates.iter().find_map(|path| {
        let bytes = fs::read(path).ok()?;
        match FontVec::try_from_vec(bytes) {
            Ok(font) => {
                log::debug!("Using font {path}");
                Some(font)
            }
            Err(e) => {
                log::debug!("Skipping font {path}: {e}");
                None
            }
        }
    })
}

/// Compose the preview image.
pub fn render(config: &OgImageConfig, fonts: &Fonts) -> RgbImage {
    let (w, h) = (config.width, config.height);
    let sx = w as f32 / REF_WIDTH;
    let sy = h as f32 / REF_HEIGHT;
    let mut img = RgbImage::from_pixel(w, h, Rgb(config.background));

    let (x0, y0, x1, y1) = ELLIPSE;
    draw_ellipse(
        &mut img,
        (x0 * sx, y0 * sy, x1 * sx, y1 * sy),
        config.accent,
        ELLIPSE_OUTLINE_WIDTH * sy,
    );

    if let Some(bold) = &fonts.bold {
        let size = BRAND_SIZE * sy;
        let left_w = text_width(bold, size, &config.brand_left);
        let right_w = text_width(bold, size, &config.brand_right);
        let x = (w as f32 - left_w - right_w) / 2.0;
        let y = BRAND_TOP * sy;
        draw_text(&mut img, bold, size, (x, y), &config.brand_left, config.text, 255);
        draw_text(&mut img, bold, size, (x + left_w, y), &config.brand_right, config.accent, 255);

        let (mx, my) = MONOGRAM_POS;
        draw_text(
            &mut img,
            bold,
            MONOGRAM_SIZE * sy,
            (mx * sx, my * sy),
            &config.monogram,
            config.accent,
            MONOGRAM_ALPHA,
        );
    }

    if let Some(regular) = fonts.regular.as_ref().or(fonts.bold.as_ref()) {
        let size = TAGLINE_SIZE * sy;
        let x = (w as f32 - text_width(regular, size, &config.tagline)) / 2.0;
        let y = (BRAND_TOP + TAGLINE_GAP) * sy;
        draw_text(&mut img, regular, size, (x, y), &config.tagline, config.muted, 255);
    }

    img
}

/// Render with the configured fonts and write a PNG to
/// `root/config.output`.
pub fn write_og_image(root: &Path, config: &OgImageConfig) -> Result<PathBuf, OgImageError> {
    let img = render(config, &Fonts::load(config));
    let target = root.join(&config.output);
    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    img.save_with_format(&target, ImageFormat::Png)?;
    log::info!("Wrote {} ({}x{})", target.display(), config.width, config.height);
    Ok(target)
}

fn blend(pixel: &mut Rgb<u8>, color: [u8; 3], alpha: f32) {
    let a = alpha.clamp(0.0, 1.0);
    for (channel, c) in pixel.0.iter_mut().zip(color) {
        *channel = (c as f32 * a + *channel as f32 * (1.0 - a)).round() as u8;
    }
}

/// Filled ellipse in `bbox` (x0, y0, x1, y1) with an outline of `width`
/// pixels, clipped to the canvas.
fn draw_ellipse(img: &mut RgbImage, bbox: (f32, f32, f32, f32), color: [u8; 3], width: f32) {
    let (x0, y0, x1, y1) = bbox;
    let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
    let (rx, ry) = ((x1 - x0) / 2.0, (y1 - y0) / 2.0);
    if rx <= 0.0 || ry <= 0.0 {
        return;
    }
    let fill = ELLIPSE_FILL_ALPHA as f32 / 255.0;
    let outline = ELLIPSE_OUTLINE_ALPHA as f32 / 255.0;

    let (w, h) = img.dimensions();
    let px_min = x0.max(0.0) as u32;
    let py_min = y0.max(0.0) as u32;
    let px_max = (x1.ceil().max(0.0) as u32).min(w);
    let py_max = (y1.ceil().max(0.0) as u32).min(h);

    for y in py_min..py_max {
        for x in px_min..px_max {
            let dx = (x as f32 + 0.5 - cx) / rx;
            let dy = (y as f32 + 0.5 - cy) / ry;
            let r = (dx * dx + dy * dy).sqrt();
            if r > 1.0 {
                continue;
            }
            let edge_distance = (1.0 - r) * rx.min(ry);
            let alpha = if edge_distance < width { outline } else { fill };
            blend(img.get_pixel_mut(x, y), color, alpha);
        }
    }
}

/// Advance width of a single line of text.
fn text_width(font: &FontVec, size: f32, text: &str) -> f32 {
    let scaled = font.as_scaled(PxScale::from(size));
    let mut width = 0.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            width += scaled.kern(prev, id);
        }
        width += scaled.h_advance(id);
        previous = Some(id);
    }
    width
}

/// Draw one line of text with its top (ascent line) at `origin.1`.
fn draw_text(
    img: &mut RgbImage,
    font: &FontVec,
    size: f32,
    origin: (f32, f32),
    text: &str,
    color: [u8; 3],
    alpha: u8,
) {
    let scale = PxScale::from(size);
    let scaled = font.as_scaled(scale);
    let baseline = origin.1 + scaled.ascent();
    let opacity = alpha as f32 / 255.0;
    let (w, h) = img.dimensions();

    let mut caret = origin.0;
    let mut previous = None;
    for c in text.chars() {
        let id = scaled.glyph_id(c);
        if let Some(prev) = previous {
            caret += scaled.kern(prev, id);
        }
        let glyph = id.with_scale_and_position(scale, point(caret, baseline));
        caret += scaled.h_advance(id);
        previous = Some(id);

        let Some(outlined) = font.outline_glyph(glyph) else {
            continue;
        };
        let bounds = outlined.px_bounds();
        outlined.draw(|gx, gy, coverage| {
            let x = bounds.min.x as i64 + gx as i64;
            let y = bounds.min.y as i64 + gy as i64;
            if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
                return;
            }
            blend(img.get_pixel_mut(x as u32, y as u32), color, coverage * opacity);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn no_fonts() -> Fonts {
        Fonts::default()
    }

    #[test]
    fn canvas_size_and_background() {
        let config = OgImageConfig::default();
        let img = render(&config, &no_fonts());
        assert_eq!(img.dimensions(), (1200, 630));
        assert_eq!(img.get_pixel(10, 620).0, config.background);
    }

    #[test]
    fn ellipse_tints_toward_accent() {
        let config = OgImageConfig::default();
        let img = render(&config, &no_fonts());
        let inside = img.get_pixel(1115, 225).0;
        assert_ne!(inside, config.background);
        // Red channel moves toward the accent, which is brighter than the background
        assert!(inside[0] > config.background[0]);
        assert!(inside[0] < config.accent[0]);
    }

    #[test]
    fn outline_is_stronger_than_fill() {
        let config = OgImageConfig::default();
        let img = render(&config, &no_fonts());
        // Leftmost point of the ellipse is x=770 at its centre row y=225
        let edge = img.get_pixel(770, 225).0;
        let fill = img.get_pixel(900, 225).0;
        assert!(edge[0] > fill[0]);
    }

    #[test]
    fn scales_to_configured_size() {
        let config = OgImageConfig {
            width: 600,
            height: 315,
            ..OgImageConfig::default()
        };
        let img = render(&config, &no_fonts());
        assert_eq!(img.dimensions(), (600, 315));
        assert_ne!(img.get_pixel(557, 112).0, config.background);
    }

    #[test]
    fn blend_extremes() {
        let mut p = Rgb([0, 0, 0]);
        blend(&mut p, [200, 100, 50], 1.0);
        assert_eq!(p.0, [200, 100, 50]);
        blend(&mut p, [0, 0, 0], 0.0);
        assert_eq!(p.0, [200, 100, 50]);
    }

    #[test]
    fn load_font_skips_missing_and_invalid() {
        let tmp = TempDir::new().unwrap();
        let junk = tmp.path().join("junk.ttf");
        fs::write(&junk, b"not a font").unwrap();
        let candidates = vec![
            tmp.path().join("missing.ttf").to_string_lossy().into_owned(),
            junk.to_string_lossy().into_owned(),
        ];
        assert!(load_font(&candidates).is_none());
    }

    #[test]
    fn write_creates_png() {
        let tmp = TempDir::new().unwrap();
        let config = OgImageConfig {
            bold_fonts: vec![],
            regular_fonts: vec![],
            ..OgImageConfig::default()
        };
        let target = write_og_image(tmp.path(), &config).unwrap();
        assert_eq!(target, tmp.path().join("assets/og-image.png"));
        assert_eq!(image::image_dimensions(&target).unwrap(), (1200, 630));
    }
}
