//! # mathpaint guide
//!
//! This module walks through mathpaint's architecture and public API end to end. For
//! copy/paste commands, run `mathpaint --help`.
//!
//! ---
//!
//! ## Core concepts
//!
//! - [`RenderRequest`](crate::RenderRequest): markup plus format, colors and the border toggle
//! - [`PaintSpec`](crate::PaintSpec): the resolved fill/stroke applied uniformly to a formula
//! - [`TypesetService`](crate::TypesetService): the process-wide typesetting context
//! - [`Renderer`](crate::Renderer): runs one request through every stage
//! - [`RenderResponse`](crate::RenderResponse): `{imageUrl}` or `{error}`, never both
//!
//! The pipeline is explicitly staged (see [`RenderStage`](crate::RenderStage)):
//!
//! 1. Validating: blank markup fails with [`MathpaintError::EmptyInput`](crate::MathpaintError::EmptyInput),
//!    and the backend is never called
//! 2. Typesetting: [`TypesetService::typeset`](crate::TypesetService::typeset)
//! 3. Recoloring: [`recolor`](crate::recolor)
//! 4. Encoding: [`encode`](crate::encode)
//! 5. Done: [`RenderedImage::data_url`](crate::RenderedImage::data_url)
//!
//! Nothing is retried. The first failing stage ends the request, and the error is logged with its
//! stage and [`ErrorKind`](crate::ErrorKind).
//!
//! ---
//!
//! ## Recoloring SVG we did not write
//!
//! The backend only promises "a root `<g>` tagged `data-mml-node="math"` containing drawable
//! elements". The recolorer therefore rewrites text with targeted patterns instead of parsing a
//! tree, and applies the paint at three levels:
//!
//! - a `<style>` block forcing `.math-content` and its descendants (`!important`)
//! - the math root group (`class="math-content"` plus presentation attributes)
//! - every `<path>` and `<rect>` (presentation attributes only)
//!
//! The last level is what a rasterizer with no CSS cascade still honors. Attribute stripping is
//! anchored on whole attribute names, so `fill-opacity` or `data-fill` are left alone. A
//! missing root group is a warning, not an error.
//!
//! Without a border, every rewritten element gets `stroke="none" stroke-width="0"`. This
//! neutralizes strokes the backend may have set (MathJax wraps output in a
//! `stroke="currentColor"` group).
//!
//! ---
//!
//! ## Rasterization and backgrounds
//!
//! SVG user units are taken at 72 dpi and oversampled to [`DEFAULT_DENSITY`](crate::DEFAULT_DENSITY).
//! PNG output keeps alpha. JPEG has no alpha, so it is flattened:
//!
//! - onto **black** when all visible ink is white (white font and no border, or a white border)
//! - onto **white** otherwise
//!
//! This keeps white text from disappearing into a white background.
//!
//! Glyphs the backend emits as `<text>` instead of paths are shaped with the system fonts, loaded
//! once per process.
//!
//! ---
//!
//! ## The typesetting backend
//!
//! [`TypesetBackend`](crate::TypesetBackend) is the seam. The default
//! [`CommandBackend`](crate::CommandBackend) spawns a bridge program per call and exchanges JSON
//! for SVG over stdio. The repository ships a MathJax bridge in `bridge/` that installs as
//! `mathjax-svg`, the default command. Tests and embedders can use [`FnBackend`](crate::FnBackend).
//!
//! [`TypesetService`](crate::TypesetService) builds the backend once, on first use, even under
//! concurrent first calls. Calls are funneled through a single gate when the backend reports
//! `is_concurrent_safe() == false` or when `serialize_calls` is configured. Recoloring and
//! encoding are pure and run fully in parallel.
