use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{MathpaintError, MathpaintResult};
use crate::raster::encode::RasterOpts;
use crate::typeset::backend::TypesetOptions;

/// Bridge command spawned by [`CommandBackend`] when none is configured.
///
/// This is the binary name the bundled `bridge/` package installs (`npm install -g ./bridge`).
///
/// [`CommandBackend`]: crate::CommandBackend
pub const DEFAULT_BRIDGE_COMMAND: &str = "mathjax-svg";

/// Opening/closing delimiter pair.
pub type Delimiters = [String; 2];

/// TeX input settings forwarded to the engine.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TexInputConfig {
    /// Extension packages to load. Empty means every package the engine ships.
    pub packages: Vec<String>,
    /// Inline math delimiters.
    pub inline_math: Vec<Delimiters>,
    /// Display math delimiters.
    pub display_math: Vec<Delimiters>,
    /// Allow `\$` to produce a literal dollar sign.
    pub process_escapes: bool,
}

fn delims(pairs: &[(&str, &str)]) -> Vec<Delimiters> {
    pairs
        .iter()
        .map(|(open, close)| [open.to_string(), close.to_string()])
        .collect()
}

impl Default for TexInputConfig {
    fn default() -> Self {
        Self {
            packages: Vec::new(),
            inline_math: delims(&[("$", "$"), ("\\(", "\\)")]),
            display_math: delims(&[("$$", "$$"), ("\\[", "\\]")]),
            process_escapes: true,
        }
    }
}

/// SVG output settings forwarded to the engine.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SvgOutputConfig {
    /// Glyph cache mode. `none` inlines every glyph as its own `<path>`.
    pub font_cache: String,
}

impl Default for SvgOutputConfig {
    fn default() -> Self {
        Self {
            font_cache: "none".to_string(),
        }
    }
}

/// Configuration of the process-wide typesetting context.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct TypesetConfig {
    /// Program spawned per typeset call.
    pub command: String,
    /// Extra arguments for `command`.
    pub args: Vec<String>,
    /// Layout parameters sent with every call.
    pub layout: TypesetOptions,
    /// TeX input settings.
    pub tex: TexInputConfig,
    /// SVG output settings.
    pub svg: SvgOutputConfig,
    /// Force single-flight access to the backend.
    pub serialize_calls: bool,
}

impl Default for TypesetConfig {
    fn default() -> Self {
        Self {
            command: DEFAULT_BRIDGE_COMMAND.to_string(),
            args: Vec::new(),
            layout: TypesetOptions::default(),
            tex: TexInputConfig::default(),
            svg: SvgOutputConfig::default(),
            serialize_calls: false,
        }
    }
}

impl TypesetConfig {
    /// Check invariants not expressible in the types.
    pub fn validate(&self) -> MathpaintResult<()> {
        if self.command.trim().is_empty() {
            return Err(MathpaintError::config("typeset command must not be empty"));
        }
        let l = &self.layout;
        for (name, v) in [
            ("em", l.em),
            ("ex", l.ex),
            ("containerWidth", l.container_width),
        ] {
            if !v.is_finite() || v <= 0.0 {
                return Err(MathpaintError::config(format!(
                    "layout.{name} must be positive, got {v}"
                )));
            }
        }
        for pair in self.tex.inline_math.iter().chain(&self.tex.display_math) {
            if pair.iter().any(|d| d.is_empty()) {
                return Err(MathpaintError::config("math delimiters must not be empty"));
            }
        }
        Ok(())
    }
}

/// Top-level configuration file.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MathpaintConfig {
    /// Typesetting backend.
    pub typeset: TypesetConfig,
    /// Rasterization.
    pub raster: RasterOpts,
}

impl MathpaintConfig {
    /// Load and validate a JSON configuration file.
    pub fn from_path(path: &Path) -> MathpaintResult<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config '{}'", path.display()))?;
        Self::from_json(&text)
    }

    /// Parse and validate JSON configuration text.
    pub fn from_json(text: &str) -> MathpaintResult<Self> {
        let cfg: Self = serde_json::from_str(text)
            .map_err(|e| MathpaintError::config(format!("parse config JSON: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate every section.
    pub fn validate(&self) -> MathpaintResult<()> {
        self.typeset.validate()?;
        if !self.raster.density.is_finite() || self.raster.density <= 0.0 {
            return Err(MathpaintError::config("raster.density must be positive"));
        }
        if !(1..=100).contains(&self.raster.quality) {
            return Err(MathpaintError::config("raster.quality must be within 1..=100"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typeset/config.rs"]
mod tests;
