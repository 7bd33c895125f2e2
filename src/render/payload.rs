use anyhow::Context as _;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::foundation::core::OutputFormat;
use crate::foundation::error::MathpaintResult;

/// Base name used when saving a rendered formula to disk.
pub const DOWNLOAD_STEM: &str = "latex-formula";

/// Build a `data:<mime>;base64,<payload>` URI.
pub fn data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a base64 data URI into its MIME type and decoded body.
pub fn parse_data_url(url: &str) -> MathpaintResult<(String, Vec<u8>)> {
    let rest = url
        .strip_prefix("data:")
        .context("data url must start with 'data:'")?;
    let (meta, body) = rest
        .split_once(',')
        .context("data url is missing ',' separator")?;
    let mime = meta
        .strip_suffix(";base64")
        .context("only base64 data urls are supported")?;
    let bytes = STANDARD.decode(body).context("invalid base64 payload")?;
    Ok((mime.to_string(), bytes))
}

/// Default file name for an image in `format`, e.g. `latex-formula.png`.
pub fn suggested_file_name(format: OutputFormat) -> String {
    format!("{DOWNLOAD_STEM}.{}", format.extension())
}

#[cfg(test)]
#[path = "../../tests/unit/render/payload.rs"]
mod tests;
