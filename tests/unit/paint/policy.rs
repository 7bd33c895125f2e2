use super::*;

#[test]
fn borderless_paint_disables_stroke_regardless_of_border_color() {
    for border in [InkColor::Black, InkColor::White] {
        let paint = resolve_paint(InkColor::Black, false, border);
        assert_eq!(paint.fill, InkColor::Black);
        assert!(paint.stroke.is_none());
        assert_eq!(
            paint.svg_attributes(),
            r#"fill="black" stroke="none" stroke-width="0""#
        );
    }
}

#[test]
fn bordered_paint_uses_fixed_width_and_round_joins() {
    let paint = resolve_paint(InkColor::White, true, InkColor::Black);
    let stroke = paint.stroke.unwrap();
    assert_eq!(stroke.color, InkColor::Black);
    assert_eq!(stroke.width, BORDER_STROKE_WIDTH);
    assert_eq!(stroke.cap, StrokeShape::Round);
    assert_eq!(stroke.join, StrokeShape::Round);
    assert_eq!(
        paint.svg_attributes(),
        r#"fill="white" stroke="black" stroke-width="2.5" stroke-linecap="round" stroke-linejoin="round""#
    );
}

#[test]
fn css_declarations_are_important() {
    let css = resolve_paint(InkColor::Black, false, InkColor::White).css_declarations();
    assert_eq!(
        css,
        "fill: black !important; stroke: none !important; stroke-width: 0 !important;"
    );

    let css = resolve_paint(InkColor::Black, true, InkColor::White).css_declarations();
    assert!(css.contains("stroke: white !important;"));
    assert!(css.contains("stroke-width: 2.5 !important;"));
    assert!(css.contains("stroke-linejoin: round !important;"));
}

#[test]
fn white_ink_detection() {
    assert!(resolve_paint(InkColor::White, false, InkColor::Black).ink_is_white());
    assert!(resolve_paint(InkColor::White, true, InkColor::White).ink_is_white());
    assert!(!resolve_paint(InkColor::White, true, InkColor::Black).ink_is_white());
    assert!(!resolve_paint(InkColor::Black, false, InkColor::White).ink_is_white());
}
