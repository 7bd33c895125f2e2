use crate::foundation::error::{MathpaintError, MathpaintResult};

/// Message returned when the markup is blank.
pub const EMPTY_INPUT_MESSAGE: &str = "LaTeX input must not be empty.";

/// Message returned when the typesetting backend yields a blank document.
pub const EMPTY_SVG_MESSAGE: &str = "MathJax produced an empty SVG. Check the LaTeX syntax.";

/// One of the two ink colors offered for glyph fill and border stroke.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InkColor {
    /// `black` (the default).
    #[default]
    Black,
    /// `white`.
    White,
}

impl InkColor {
    /// SVG/CSS color keyword.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Black => "black",
            Self::White => "white",
        }
    }

    /// Opaque RGBA8 value of this color.
    pub fn rgba8(self) -> [u8; 4] {
        match self {
            Self::Black => [0, 0, 0, 255],
            Self::White => [255, 255, 255, 255],
        }
    }
}

impl std::fmt::Display for InkColor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raster output format.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum OutputFormat {
    /// Lossless PNG with alpha preserved.
    #[default]
    #[serde(rename = "png", alias = "lossless")]
    Png,
    /// Lossy JPEG, flattened onto an opaque background.
    #[serde(rename = "jpg", alias = "lossy", alias = "jpeg")]
    Jpeg,
}

impl OutputFormat {
    /// MIME type used in the data URI.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// File extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }

    /// Whether the format keeps an alpha channel.
    pub fn is_lossless(self) -> bool {
        matches!(self, Self::Png)
    }

    /// Inverse of [`OutputFormat::mime_type`].
    pub fn from_mime_type(mime: &str) -> Option<Self> {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" | "image/jpg" => Some(Self::Jpeg),
            _ => None,
        }
    }
}

/// A single render request, as received over the RPC boundary.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderRequest {
    /// TeX markup to typeset.
    pub markup: String,
    /// Requested raster format.
    #[serde(default)]
    pub format: OutputFormat,
    /// Outline glyphs with `border_color`.
    #[serde(default)]
    pub with_border: bool,
    /// Glyph fill color.
    #[serde(default)]
    pub font_color: InkColor,
    /// Border stroke color; ignored unless `with_border` is set.
    #[serde(default)]
    pub border_color: InkColor,
}

impl RenderRequest {
    /// Request `markup` as a borderless black PNG.
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
            format: OutputFormat::Png,
            with_border: false,
            font_color: InkColor::Black,
            border_color: InkColor::Black,
        }
    }

    /// Set the output format.
    pub fn format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the glyph fill color.
    pub fn font_color(mut self, color: InkColor) -> Self {
        self.font_color = color;
        self
    }

    /// Enable a border in `color`.
    pub fn border(mut self, color: InkColor) -> Self {
        self.with_border = true;
        self.border_color = color;
        self
    }

    /// Reject markup that is blank after trimming.
    pub fn validate(&self) -> MathpaintResult<()> {
        if self.markup.trim().is_empty() {
            return Err(MathpaintError::empty_input(EMPTY_INPUT_MESSAGE));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
