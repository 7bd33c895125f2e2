//! Textual SVG recoloring.
//!
//! The typesetting backend's tree shape is only loosely specified: a root `<g>` tagged
//! `data-mml-node="math"` containing drawable elements. Rather than parse the document, the
//! recolorer rewrites it with targeted patterns and applies the paint three times over:
//!
//! 1. a `<style>` block forcing fill/stroke on `.math-content` and all its descendants,
//! 2. the math root group itself (class + presentation attributes),
//! 3. every drawable element (presentation attributes only).
//!
//! Rasterizers with partial CSS support still honor (3), so colors hold even when the cascade is
//! ignored.

use std::sync::OnceLock;

use regex::{Captures, Regex};

use crate::foundation::core::EMPTY_SVG_MESSAGE;
use crate::foundation::error::{MathpaintError, MathpaintResult};
use crate::paint::policy::PaintSpec;

/// Class attached to the math root group and targeted by the injected style block.
pub const MATH_CONTENT_CLASS: &str = "math-content";

/// Outcome of locating the math root group.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RootGroupStatus {
    /// The root group was found and rewritten.
    Rewritten,
    /// Groups exist, but none is tagged as the math root.
    Missing,
    /// The document contains no `<g>` element at all.
    NoGroups,
}

/// What [`recolor_with_report`] changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecolorReport {
    /// Whether the style block was inserted after the `<svg>` open tag.
    pub style_injected: bool,
    /// Root group handling.
    pub root_group: RootGroupStatus,
    /// Number of `<path>`/`<rect>` elements that received literal paint attributes.
    pub elements_rewritten: usize,
}

fn regex(pattern: &'static str, desc: &'static str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|err| panic!("invalid {desc} regex: {err}"))
}

fn svg_open_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)<svg\b[^>]*>", "svg open tag"))
}

fn math_root_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?i)<(g)(\s[^>]*?\bdata-mml-node\s*=\s*["']math["'][^>]*?)\s*(/?)>"#,
            "math root group",
        )
    })
}

fn any_group() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)<g[\s/>]", "group"))
}

fn drawable_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r"(?i)<(path|rect)\b([^>]*?)(/?)>", "drawable element"))
}

fn paint_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        regex(
            r#"(?i)\s+(?:fill|stroke|stroke-width|stroke-linecap|stroke-linejoin)\s*=\s*(?:"[^"]*"|'[^']*')"#,
            "paint attribute",
        )
    })
}

fn class_attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| regex(r#"(?i)\s+class\s*=\s*(?:"[^"]*"|'[^']*')"#, "class attribute"))
}

/// Recolor `svg` with `paint`.
///
/// A missing math root group is logged and tolerated; the style block still applies.
pub fn recolor(svg: &str, paint: &PaintSpec) -> MathpaintResult<String> {
    let (out, report) = recolor_with_report(svg, paint)?;

    match report.root_group {
        RootGroupStatus::Rewritten => tracing::debug!(
            fill = %paint.fill,
            border = ?paint.stroke.map(|s| s.color),
            elements = report.elements_rewritten,
            "recolored svg"
        ),
        RootGroupStatus::Missing => tracing::warn!(
            elements = report.elements_rewritten,
            "math root group not found; colors and border may not apply to every element"
        ),
        RootGroupStatus::NoGroups => {
            tracing::warn!("svg output contains no <g> element; colors and border cannot be applied")
        }
    }
    if !report.style_injected {
        tracing::warn!("svg open tag not found; style block was not injected");
    }

    Ok(out)
}

/// Like [`recolor`], also returning what was changed. Does not log.
pub fn recolor_with_report(
    svg: &str,
    paint: &PaintSpec,
) -> MathpaintResult<(String, RecolorReport)> {
    if svg.trim().is_empty() {
        return Err(MathpaintError::empty_output(EMPTY_SVG_MESSAGE));
    }

    let (out, style_injected) = inject_style_block(svg, paint);
    let (out, root_group) = rewrite_root_group(&out, paint);
    let (out, elements_rewritten) = rewrite_drawables(&out, paint);

    Ok((
        out,
        RecolorReport {
            style_injected,
            root_group,
            elements_rewritten,
        },
    ))
}

fn style_block(paint: &PaintSpec) -> String {
    let decls = paint.css_declarations();
    format!(
        "<defs><style type=\"text/css\"><![CDATA[\n.{MATH_CONTENT_CLASS} {{ {decls} }}\n.{MATH_CONTENT_CLASS} * {{ {decls} }}\n]]></style></defs>"
    )
}

fn inject_style_block(svg: &str, paint: &PaintSpec) -> (String, bool) {
    let Some(open) = svg_open_tag().find(svg) else {
        return (svg.to_owned(), false);
    };
    // `<svg .../>` has no children to hold a <defs>.
    if open.as_str().ends_with("/>") {
        return (svg.to_owned(), false);
    }

    let block = style_block(paint);
    let mut out = String::with_capacity(svg.len() + block.len());
    out.push_str(&svg[..open.end()]);
    out.push_str(&block);
    out.push_str(&svg[open.end()..]);
    (out, true)
}

fn rewrite_root_group(svg: &str, paint: &PaintSpec) -> (String, RootGroupStatus) {
    let mut replaced = false;
    let out = math_root_group().replacen(svg, 1, |caps: &Captures<'_>| {
        replaced = true;
        let attrs = paint_attribute().replace_all(&caps[2], "");
        let attrs = class_attribute().replace_all(&attrs, "");
        let extra = format!(r#"class="{MATH_CONTENT_CLASS}" {}"#, paint.svg_attributes());
        build_tag(&caps[1], &attrs, &extra, !caps[3].is_empty())
    });

    let status = if replaced {
        RootGroupStatus::Rewritten
    } else if any_group().is_match(svg) {
        RootGroupStatus::Missing
    } else {
        RootGroupStatus::NoGroups
    };
    (out.into_owned(), status)
}

fn rewrite_drawables(svg: &str, paint: &PaintSpec) -> (String, usize) {
    let extra = paint.svg_attributes();
    let mut count = 0usize;
    let out = drawable_element().replace_all(svg, |caps: &Captures<'_>| {
        count += 1;
        let attrs = paint_attribute().replace_all(&caps[2], "");
        build_tag(&caps[1], &attrs, &extra, !caps[3].is_empty())
    });
    (out.into_owned(), count)
}

fn build_tag(name: &str, attrs: &str, extra: &str, self_closing: bool) -> String {
    let attrs = attrs.trim();
    let mut out = String::with_capacity(name.len() + attrs.len() + extra.len() + 4);
    out.push('<');
    out.push_str(name);
    if !attrs.is_empty() {
        out.push(' ');
        out.push_str(attrs);
    }
    out.push(' ');
    out.push_str(extra);
    out.push_str(if self_closing { "/>" } else { ">" });
    out
}

#[cfg(test)]
#[path = "../../tests/unit/svg/recolor.rs"]
mod tests;
