//! mathpaint renders TeX math into colored, optionally outlined PNG/JPEG images.
//!
//! The typesetting engine is an external collaborator that turns markup into SVG. This crate
//! owns everything after that: forcing a uniform paint onto the SVG it did not author, then
//! rasterizing and encoding it.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: reject blank markup before touching the backend
//! 2. **Typeset**: `markup -> SVG` through the shared [`TypesetService`]
//! 3. **Recolor**: [`recolor`] rewrites fill/stroke with a [`PaintSpec`] from [`resolve_paint`]
//! 4. **Encode**: [`encode`] rasterizes at 300 dpi and writes PNG (alpha kept) or JPEG (flattened)
//! 5. **Wrap**: the bytes become a `data:` URI in a [`RenderResponse`]
//!
//! [`Renderer`] runs these stages; see [`crate::guide`] for the details.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;
mod paint;
mod raster;
mod render;
mod svg;
mod typeset;

/// Walkthrough of the render pipeline and its invariants.
pub mod guide;
/// Built-in example expressions.
pub mod samples;

pub use foundation::core::{
    EMPTY_INPUT_MESSAGE, EMPTY_SVG_MESSAGE, InkColor, OutputFormat, RenderRequest,
};
pub use foundation::error::{ErrorKind, MathpaintError, MathpaintResult};
pub use paint::policy::{BORDER_STROKE_WIDTH, BorderStroke, PaintSpec, StrokeShape, resolve_paint};
pub use raster::encode::{
    DEFAULT_DENSITY, DEFAULT_QUALITY, EncodedImage, RasterOpts, encode, flatten_background,
};
pub use render::orchestrator::{RenderResponse, RenderStage, RenderedImage, Renderer};
pub use render::payload::{DOWNLOAD_STEM, data_url, parse_data_url, suggested_file_name};
pub use samples::{SAMPLES, Sample, find_sample};
pub use svg::recolor::{
    MATH_CONTENT_CLASS, RecolorReport, RootGroupStatus, recolor, recolor_with_report,
};
pub use typeset::backend::{FnBackend, TypesetBackend, TypesetOptions};
pub use typeset::command::{CommandBackend, is_command_on_path};
pub use typeset::config::{
    DEFAULT_BRIDGE_COMMAND, Delimiters, MathpaintConfig, SvgOutputConfig, TexInputConfig,
    TypesetConfig,
};
pub use typeset::service::TypesetService;
