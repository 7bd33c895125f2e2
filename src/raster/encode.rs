use std::io::Cursor;
use std::sync::{Arc, OnceLock};

use image::ImageEncoder as _;

use crate::foundation::core::{InkColor, OutputFormat};
use crate::foundation::error::{MathpaintError, MathpaintResult};
use crate::foundation::math::{demultiply_rgba8_in_place, mul_div255_u16};
use crate::paint::policy::PaintSpec;

/// Rasterization density used when none is configured, in dots per inch.
pub const DEFAULT_DENSITY: f32 = 300.0;
/// Encoder quality used when none is configured (JPEG only; PNG is lossless).
pub const DEFAULT_QUALITY: u8 = 90;

/// SVG user units are interpreted at this many dots per inch.
const NOMINAL_DENSITY: f32 = 72.0;
const MAX_DIM: u32 = 16_384;

/// Rasterization options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RasterOpts {
    /// Oversampling density in dots per inch.
    pub density: f32,
    /// Lossy encoder quality (1..=100).
    pub quality: u8,
}

impl Default for RasterOpts {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            quality: DEFAULT_QUALITY,
        }
    }
}

/// An encoded raster image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedImage {
    /// Encoded file bytes.
    pub bytes: Vec<u8>,
    /// Encoding used for `bytes`.
    pub format: OutputFormat,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl EncodedImage {
    /// MIME type of `bytes`.
    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }
}

/// Background a lossy encode is flattened onto, or `None` for lossless output.
///
/// White-only ink goes on black so it stays visible; everything else goes on white.
pub fn flatten_background(format: OutputFormat, paint: &PaintSpec) -> Option<InkColor> {
    if format.is_lossless() {
        return None;
    }
    Some(if paint.ink_is_white() {
        InkColor::Black
    } else {
        InkColor::White
    })
}

/// Rasterize `svg` and encode it as `format`.
pub fn encode(
    svg: &str,
    format: OutputFormat,
    paint: &PaintSpec,
    opts: &RasterOpts,
) -> MathpaintResult<EncodedImage> {
    let tree = parse_svg(svg)?;
    let (width, height) = raster_size(&tree, opts.density)?;
    let premul = rasterize_to_premul_rgba8(&tree, width, height)?;

    let bytes = match flatten_background(format, paint) {
        None => {
            let mut rgba = premul;
            demultiply_rgba8_in_place(&mut rgba);
            encode_png(&rgba, width, height)?
        }
        Some(bg) => {
            let rgb = flatten_premul_over_bg_to_rgb8(&premul, bg.rgba8())?;
            encode_jpeg(&rgb, width, height, opts.quality)?
        }
    };

    tracing::debug!(
        width,
        height,
        format = format.extension(),
        bytes = bytes.len(),
        "encoded raster"
    );

    Ok(EncodedImage {
        bytes,
        format,
        width,
        height,
    })
}

fn parse_svg(svg: &str) -> MathpaintResult<usvg::Tree> {
    let opts = usvg::Options {
        fontdb: svg_fontdb(),
        ..Default::default()
    };
    usvg::Tree::from_str(svg, &opts)
        .map_err(|e| MathpaintError::encode(format!("invalid svg for rasterizer: {e}")))
}

/// Generic families usvg resolves to, in preference order, when the platform defaults
/// (Times New Roman, Arial, Courier New) are not installed.
const SERIF_CANDIDATES: &[&str] = &["DejaVu Serif", "Liberation Serif", "Noto Serif", "FreeSerif"];
const SANS_CANDIDATES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "FreeSans"];
const MONO_CANDIDATES: &[&str] = &[
    "DejaVu Sans Mono",
    "Liberation Mono",
    "Noto Sans Mono",
    "FreeMono",
];

/// System font database shared by every rasterization.
///
/// MathJax emits `<text>` for characters outside its own glyph tables (accented letters, CJK,
/// many symbols); without faces loaded those would rasterize as nothing.
pub(crate) fn svg_fontdb() -> Arc<usvg::fontdb::Database> {
    static DB: OnceLock<Arc<usvg::fontdb::Database>> = OnceLock::new();
    Arc::clone(DB.get_or_init(|| {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        bind_generic_families(&mut db);
        tracing::debug!(faces = db.len(), "loaded system fonts for svg text");
        Arc::new(db)
    }))
}

fn bind_generic_families(db: &mut usvg::fontdb::Database) {
    use usvg::fontdb::Family;

    let installed: Vec<String> = db
        .faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.clone()))
        .collect();
    let has = |name: &str| installed.iter().any(|f| f == name);
    let pick = |current: &str, candidates: &[&str]| -> Option<String> {
        if has(current) {
            return None;
        }
        candidates
            .iter()
            .find(|c| has(**c))
            .map(|c| c.to_string())
            .or_else(|| installed.first().cloned())
    };

    let serif = pick(db.family_name(&Family::Serif), SERIF_CANDIDATES);
    let sans = pick(db.family_name(&Family::SansSerif), SANS_CANDIDATES);
    let mono = pick(db.family_name(&Family::Monospace), MONO_CANDIDATES);
    if let Some(name) = serif {
        db.set_serif_family(name);
    }
    if let Some(name) = sans {
        db.set_sans_serif_family(name);
    }
    if let Some(name) = mono {
        db.set_monospace_family(name);
    }
}

/// Pixel size of `tree` rendered at `density`.
pub(crate) fn raster_size(tree: &usvg::Tree, density: f32) -> MathpaintResult<(u32, u32)> {
    if !density.is_finite() || density <= 0.0 {
        return Err(MathpaintError::encode(format!(
            "raster density must be positive, got {density}"
        )));
    }
    let scale = density / NOMINAL_DENSITY;

    fn to_px(v: f32) -> MathpaintResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(MathpaintError::encode("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    }

    let size = tree.size();
    let w = to_px(size.width() * scale)?;
    let h = to_px(size.height() * scale)?;

    // Avoid pathological allocations from runaway container widths.
    if w > MAX_DIM || h > MAX_DIM {
        return Err(MathpaintError::encode(format!(
            "svg raster size too large: {w}x{h} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    Ok((w, h))
}

fn rasterize_to_premul_rgba8(tree: &usvg::Tree, width: u32, height: u32) -> MathpaintResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| MathpaintError::encode("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

fn flatten_premul_over_bg_to_rgb8(src_premul: &[u8], bg_rgba: [u8; 4]) -> MathpaintResult<Vec<u8>> {
    if !src_premul.len().is_multiple_of(4) {
        return Err(MathpaintError::encode(
            "flatten expects an rgba8 buffer (length multiple of 4)",
        ));
    }

    let bg_r = bg_rgba[0] as u16;
    let bg_g = bg_rgba[1] as u16;
    let bg_b = bg_rgba[2] as u16;

    let mut dst = Vec::with_capacity(src_premul.len() / 4 * 3);
    for s in src_premul.chunks_exact(4) {
        let a = s[3] as u16;
        if a == 255 {
            dst.extend_from_slice(&s[..3]);
            continue;
        }

        let inv = 255u16 - a;
        let r = s[0] as u16 + mul_div255_u16(bg_r, inv);
        let g = s[1] as u16 + mul_div255_u16(bg_g, inv);
        let b = s[2] as u16 + mul_div255_u16(bg_b, inv);

        dst.push(r.min(255) as u8);
        dst.push(g.min(255) as u8);
        dst.push(b.min(255) as u8);
    }
    Ok(dst)
}

fn encode_png(rgba: &[u8], width: u32, height: u32) -> MathpaintResult<Vec<u8>> {
    let mut buf = Vec::new();
    image::codecs::png::PngEncoder::new_with_quality(
        Cursor::new(&mut buf),
        image::codecs::png::CompressionType::Default,
        image::codecs::png::FilterType::Adaptive,
    )
    .write_image(rgba, width, height, image::ExtendedColorType::Rgba8)
    .map_err(|e| MathpaintError::encode(format!("png encode failed: {e}")))?;
    Ok(buf)
}

fn encode_jpeg(rgb: &[u8], width: u32, height: u32, quality: u8) -> MathpaintResult<Vec<u8>> {
    let quality = quality.clamp(1, 100);
    let mut buf = Vec::new();
    image::codecs::jpeg::JpegEncoder::new_with_quality(Cursor::new(&mut buf), quality)
        .write_image(rgb, width, height, image::ExtendedColorType::Rgb8)
        .map_err(|e| MathpaintError::encode(format!("jpeg encode failed: {e}")))?;
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/raster/encode.rs"]
mod tests;
