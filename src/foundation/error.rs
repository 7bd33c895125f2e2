/// Convenience result type used across mathpaint.
pub type MathpaintResult<T> = Result<T, MathpaintError>;

/// Top-level error taxonomy used by the render pipeline.
#[derive(thiserror::Error, Debug)]
pub enum MathpaintError {
    /// The markup was empty or whitespace-only.
    #[error("empty input: {0}")]
    EmptyInput(String),

    /// The typesetting backend rejected or could not parse the markup.
    #[error("typeset error: {0}")]
    Typeset(String),

    /// The backend succeeded but produced nothing renderable.
    #[error("empty output: {0}")]
    EmptyOutput(String),

    /// Rasterization or image encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Invalid or unreadable configuration.
    #[error("config error: {0}")]
    Config(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Tag identifying which stage produced a [`MathpaintError`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// See [`MathpaintError::EmptyInput`].
    EmptyInput,
    /// See [`MathpaintError::Typeset`].
    Typeset,
    /// See [`MathpaintError::EmptyOutput`].
    EmptyOutput,
    /// See [`MathpaintError::Encode`].
    Encode,
    /// See [`MathpaintError::Config`].
    Config,
    /// Anything not covered by a more specific kind.
    Unexpected,
}

impl MathpaintError {
    /// Build a [`MathpaintError::EmptyInput`] value.
    pub fn empty_input(msg: impl Into<String>) -> Self {
        Self::EmptyInput(msg.into())
    }

    /// Build a [`MathpaintError::Typeset`] value.
    pub fn typeset(msg: impl Into<String>) -> Self {
        Self::Typeset(msg.into())
    }

    /// Build a [`MathpaintError::EmptyOutput`] value.
    pub fn empty_output(msg: impl Into<String>) -> Self {
        Self::EmptyOutput(msg.into())
    }

    /// Build a [`MathpaintError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Build a [`MathpaintError::Config`] value.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyInput(_) => ErrorKind::EmptyInput,
            Self::Typeset(_) => ErrorKind::Typeset,
            Self::EmptyOutput(_) => ErrorKind::EmptyOutput,
            Self::Encode(_) => ErrorKind::Encode,
            Self::Config(_) => ErrorKind::Config,
            Self::Other(_) => ErrorKind::Unexpected,
        }
    }

    /// Message suitable for showing to the person who typed the markup.
    ///
    /// Backend diagnostics are kept verbatim so the user can fix their syntax.
    pub fn user_message(&self) -> String {
        match self {
            Self::EmptyInput(msg) | Self::EmptyOutput(msg) | Self::Config(msg) => msg.clone(),
            Self::Typeset(diag) if diag.contains("[MathJax]") => {
                format!("MathJax parse error: {diag}. Please check your LaTeX syntax.")
            }
            Self::Typeset(diag) => format!("Could not render LaTeX. Details: {diag}"),
            Self::Encode(msg) => format!("Could not rasterize the rendered formula. Details: {msg}"),
            Self::Other(err) => format!("Could not render LaTeX. Details: {err:#}"),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
