use super::*;
use crate::paint::policy::resolve_paint;

// 72 user units at 300 dpi -> 300 px.
const SQUARE_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="72" height="36" viewBox="0 0 72 36"><rect x="24" y="6" width="24" height="24" fill="white"/></svg>"#;

fn decode(img: &EncodedImage) -> image::RgbaImage {
    image::load_from_memory(&img.bytes).unwrap().to_rgba8()
}

#[test]
fn flatten_premul_alpha_0_returns_bg() {
    let src = vec![0u8, 0, 0, 0];
    let dst = flatten_premul_over_bg_to_rgb8(&src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![10, 20, 30]);
}

#[test]
fn flatten_premul_alpha_255_is_identity() {
    let src = vec![1u8, 2, 3, 255];
    let dst = flatten_premul_over_bg_to_rgb8(&src, [10, 20, 30, 255]).unwrap();
    assert_eq!(dst, vec![1, 2, 3]);
}

#[test]
fn flatten_rejects_ragged_buffers() {
    assert!(flatten_premul_over_bg_to_rgb8(&[0u8, 0, 0], [0, 0, 0, 255]).is_err());
}

#[test]
fn background_rule_follows_visible_ink() {
    let white = resolve_paint(InkColor::White, false, InkColor::Black);
    let white_on_white_border = resolve_paint(InkColor::White, true, InkColor::White);
    let white_black_border = resolve_paint(InkColor::White, true, InkColor::Black);
    let black = resolve_paint(InkColor::Black, false, InkColor::White);

    assert_eq!(flatten_background(OutputFormat::Jpeg, &white), Some(InkColor::Black));
    assert_eq!(
        flatten_background(OutputFormat::Jpeg, &white_on_white_border),
        Some(InkColor::Black)
    );
    assert_eq!(
        flatten_background(OutputFormat::Jpeg, &white_black_border),
        Some(InkColor::White)
    );
    assert_eq!(flatten_background(OutputFormat::Jpeg, &black), Some(InkColor::White));
    assert_eq!(flatten_background(OutputFormat::Png, &white), None);
}

#[test]
fn png_keeps_alpha_and_oversamples() {
    let paint = resolve_paint(InkColor::White, false, InkColor::Black);
    let img = encode(SQUARE_SVG, OutputFormat::Png, &paint, &RasterOpts::default()).unwrap();
    assert_eq!(img.mime_type(), "image/png");
    assert_eq!((img.width, img.height), (300, 150));

    let px = decode(&img);
    assert_eq!(px.dimensions(), (300, 150));
    assert_eq!(px.get_pixel(0, 0).0[3], 0);
    assert_eq!(px.get_pixel(150, 75).0, [255, 255, 255, 255]);
}

#[test]
fn jpeg_white_ink_is_flattened_onto_black() {
    let paint = resolve_paint(InkColor::White, false, InkColor::Black);
    let img = encode(SQUARE_SVG, OutputFormat::Jpeg, &paint, &RasterOpts::default()).unwrap();
    assert_eq!(img.mime_type(), "image/jpeg");

    let px = decode(&img);
    let corner = px.get_pixel(0, 0).0;
    assert!(corner[..3].iter().all(|&c| c < 16), "{corner:?}");
    let center = px.get_pixel(150, 75).0;
    assert!(center[..3].iter().all(|&c| c > 239), "{center:?}");
}

#[test]
fn jpeg_black_ink_is_flattened_onto_white() {
    let svg = SQUARE_SVG.replace(r#"fill="white""#, r#"fill="black""#);
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    let img = encode(&svg, OutputFormat::Jpeg, &paint, &RasterOpts::default()).unwrap();

    let px = decode(&img);
    let corner = px.get_pixel(0, 0).0;
    assert!(corner[..3].iter().all(|&c| c > 239), "{corner:?}");
}

#[test]
fn density_scales_output() {
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    let opts = RasterOpts {
        density: 72.0,
        ..RasterOpts::default()
    };
    let img = encode(SQUARE_SVG, OutputFormat::Png, &paint, &opts).unwrap();
    assert_eq!((img.width, img.height), (72, 36));
}

#[test]
fn malformed_svg_is_encode_error() {
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    for svg in ["<svg", "not svg at all", r#"<svg xmlns="http://www.w3.org/2000/svg"><g></svg>"#] {
        let err = encode(svg, OutputFormat::Png, &paint, &RasterOpts::default()).unwrap_err();
        assert!(matches!(err, MathpaintError::Encode(_)), "{svg}: {err}");
    }
}

#[test]
fn invalid_density_is_rejected() {
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    let opts = RasterOpts {
        density: 0.0,
        ..RasterOpts::default()
    };
    let err = encode(SQUARE_SVG, OutputFormat::Png, &paint, &opts).unwrap_err();
    assert!(matches!(err, MathpaintError::Encode(_)));
}

#[test]
fn oversized_output_is_rejected() {
    let svg = r#"<svg xmlns="http://www.w3.org/2000/svg" width="10000" height="10" viewBox="0 0 10000 10"/>"#;
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    let err = encode(svg, OutputFormat::Png, &paint, &RasterOpts::default()).unwrap_err();
    assert!(err.to_string().contains("too large"));
}

// MathJax falls back to `<text>` for glyphs outside its own tables.
const TEXT_SVG: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="72" height="36" viewBox="0 0 72 36"><text x="4" y="28" font-family="sans-serif" font-size="24" fill="black">éW</text></svg>"#;

#[test]
fn text_glyphs_leave_ink() {
    if svg_fontdb().is_empty() {
        eprintln!("skipping: no system fonts installed");
        return;
    }
    let paint = resolve_paint(InkColor::Black, false, InkColor::Black);
    let img = encode(TEXT_SVG, OutputFormat::Png, &paint, &RasterOpts::default()).unwrap();
    let inked = decode(&img).pixels().filter(|p| p.0[3] > 0).count();
    assert!(inked > 0, "text rasterized without ink");
}

#[test]
fn generic_families_resolve_to_installed_faces() {
    use usvg::fontdb::{Family, Query};

    let db = svg_fontdb();
    if db.is_empty() {
        return;
    }
    for family in [Family::Serif, Family::SansSerif, Family::Monospace] {
        let query = Query {
            families: &[family],
            ..Query::default()
        };
        assert!(db.query(&query).is_some(), "{}", db.family_name(&family));
    }
}

#[test]
fn font_database_is_shared() {
    assert!(Arc::ptr_eq(&svg_fontdb(), &svg_fontdb()));
}
