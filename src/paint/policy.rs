use crate::foundation::core::InkColor;

/// Stroke width applied to every outlined element, in SVG user units.
///
/// Independent of rasterization density; tuned for the default 300 dpi output.
pub const BORDER_STROKE_WIDTH: f32 = 2.5;

/// SVG `stroke-linecap` / `stroke-linejoin` value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StrokeShape {
    /// `round`
    Round,
}

impl StrokeShape {
    /// SVG/CSS keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Round => "round",
        }
    }
}

/// Enabled border stroke.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BorderStroke {
    /// Stroke color.
    pub color: InkColor,
    /// Stroke width in SVG user units.
    pub width: f32,
    /// Line cap.
    pub cap: StrokeShape,
    /// Line join.
    pub join: StrokeShape,
}

/// Fill/stroke parameters applied uniformly to a rendered formula.
///
/// `stroke: None` means the stroke is explicitly disabled (`stroke="none" stroke-width="0"`),
/// not merely left unspecified.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaintSpec {
    /// Glyph fill color.
    pub fill: InkColor,
    /// Border stroke, if any.
    pub stroke: Option<BorderStroke>,
}

/// Resolve the requested colors into a concrete [`PaintSpec`].
pub fn resolve_paint(font_color: InkColor, with_border: bool, border_color: InkColor) -> PaintSpec {
    let stroke = with_border.then_some(BorderStroke {
        color: border_color,
        width: BORDER_STROKE_WIDTH,
        cap: StrokeShape::Round,
        join: StrokeShape::Round,
    });
    PaintSpec {
        fill: font_color,
        stroke,
    }
}

impl PaintSpec {
    /// Whether all visible ink is white, i.e. would vanish on a white background.
    pub fn ink_is_white(&self) -> bool {
        self.fill == InkColor::White
            && self
                .stroke
                .is_none_or(|stroke| stroke.color == InkColor::White)
    }

    /// Paint as SVG presentation attributes, in a fixed order: `fill`, then the stroke group.
    pub fn svg_attributes(&self) -> String {
        let mut out = format!(r#"fill="{}""#, self.fill);
        match self.stroke {
            Some(s) => out.push_str(&format!(
                r#" stroke="{}" stroke-width="{}" stroke-linecap="{}" stroke-linejoin="{}""#,
                s.color,
                s.width,
                s.cap.as_str(),
                s.join.as_str()
            )),
            None => out.push_str(r#" stroke="none" stroke-width="0""#),
        }
        out
    }

    /// Paint as CSS declarations, each marked `!important`.
    pub fn css_declarations(&self) -> String {
        let mut out = format!("fill: {} !important;", self.fill);
        match self.stroke {
            Some(s) => out.push_str(&format!(
                " stroke: {} !important; stroke-width: {} !important; stroke-linecap: {} !important; stroke-linejoin: {} !important;",
                s.color,
                s.width,
                s.cap.as_str(),
                s.join.as_str()
            )),
            None => out.push_str(" stroke: none !important; stroke-width: 0 !important;"),
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/policy.rs"]
mod tests;
