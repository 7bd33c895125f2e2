use std::sync::Arc;

use crate::foundation::core::{InkColor, OutputFormat, RenderRequest};
use crate::foundation::error::MathpaintResult;
use crate::paint::policy::resolve_paint;
use crate::raster::encode::{EncodedImage, RasterOpts, encode};
use crate::render::payload::data_url;
use crate::svg::recolor::recolor;
use crate::typeset::service::TypesetService;

/// Pipeline stage, used to label logs and failures.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderStage {
    /// Checking the request.
    Validating,
    /// Waiting on the typesetting backend.
    Typesetting,
    /// Rewriting the SVG paint.
    Recoloring,
    /// Rasterizing and encoding.
    Encoding,
    /// Finished successfully.
    Done,
}

impl RenderStage {
    /// Stable lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validating => "validating",
            Self::Typesetting => "typesetting",
            Self::Recoloring => "recoloring",
            Self::Encoding => "encoding",
            Self::Done => "done",
        }
    }
}

/// Successful render output.
#[derive(Clone, Debug)]
pub struct RenderedImage {
    /// Encoded raster.
    pub image: EncodedImage,
    /// Recolored SVG that was rasterized.
    pub svg: String,
}

impl RenderedImage {
    /// Self-describing `data:` URI of the encoded image.
    pub fn data_url(&self) -> String {
        data_url(self.image.mime_type(), &self.image.bytes)
    }
}

/// Wire response: exactly one of `image_url` or `error` is set.
#[derive(Clone, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderResponse {
    /// `data:<mime>;base64,<payload>` on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    /// User-facing error message on failure.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl RenderResponse {
    /// Successful response.
    pub fn image(url: String) -> Self {
        Self {
            image_url: Some(url),
            error: None,
        }
    }

    /// Failed response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            image_url: None,
            error: Some(message.into()),
        }
    }
}

impl From<MathpaintResult<RenderedImage>> for RenderResponse {
    fn from(result: MathpaintResult<RenderedImage>) -> Self {
        match result {
            Ok(rendered) => Self::image(rendered.data_url()),
            Err(err) => Self::failure(err.user_message()),
        }
    }
}

/// Runs the markup to image pipeline.
///
/// Each call is independent; the only shared state is the injected [`TypesetService`]. No stage
/// is retried, and the first failure ends the request.
#[derive(Clone, Debug)]
pub struct Renderer {
    typesetter: Arc<TypesetService>,
    raster: RasterOpts,
}

impl Renderer {
    /// Create a renderer using `typesetter` and default raster options.
    pub fn new(typesetter: Arc<TypesetService>) -> Self {
        Self {
            typesetter,
            raster: RasterOpts::default(),
        }
    }

    /// Override raster options.
    pub fn with_raster_opts(mut self, raster: RasterOpts) -> Self {
        self.raster = raster;
        self
    }

    /// Raster options in use.
    pub fn raster_opts(&self) -> &RasterOpts {
        &self.raster
    }

    /// Render `req` into an encoded image.
    #[tracing::instrument(skip_all, fields(format = req.format.extension(), border = req.with_border))]
    pub fn render(&self, req: &RenderRequest) -> MathpaintResult<RenderedImage> {
        let mut stage = RenderStage::Validating;
        let result = self.run(req, &mut stage);
        match &result {
            Ok(rendered) => tracing::info!(
                width = rendered.image.width,
                height = rendered.image.height,
                bytes = rendered.image.bytes.len(),
                font_color = %req.font_color,
                "render complete"
            ),
            Err(err) => tracing::error!(
                stage = stage.as_str(),
                kind = ?err.kind(),
                error = %err,
                "render failed"
            ),
        }
        result
    }

    fn run(&self, req: &RenderRequest, stage: &mut RenderStage) -> MathpaintResult<RenderedImage> {
        req.validate()?;

        advance(stage, RenderStage::Typesetting);
        let svg = self.typesetter.typeset(&req.markup)?;

        advance(stage, RenderStage::Recoloring);
        let paint = resolve_paint(req.font_color, req.with_border, req.border_color);
        let svg = recolor(&svg, &paint)?;

        advance(stage, RenderStage::Encoding);
        let image = encode(&svg, req.format, &paint, &self.raster)?;

        advance(stage, RenderStage::Done);
        Ok(RenderedImage { image, svg })
    }

    /// Render `req` and fold the outcome into a wire response.
    pub fn respond(&self, req: &RenderRequest) -> RenderResponse {
        self.render(req).into()
    }

    /// Positional form of [`Renderer::respond`].
    pub fn render_markup(
        &self,
        markup: &str,
        format: OutputFormat,
        with_border: bool,
        font_color: InkColor,
        border_color: InkColor,
    ) -> RenderResponse {
        self.respond(&RenderRequest {
            markup: markup.to_string(),
            format,
            with_border,
            font_color,
            border_color,
        })
    }
}

fn advance(stage: &mut RenderStage, next: RenderStage) {
    tracing::debug!(from = stage.as_str(), to = next.as_str(), "render stage");
    *stage = next;
}

#[cfg(test)]
#[path = "../../tests/unit/render/orchestrator.rs"]
mod tests;
