use crate::foundation::error::MathpaintResult;

/// Fixed layout parameters passed to the typesetting backend.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TypesetOptions {
    /// Display (block) math rather than inline.
    pub display: bool,
    /// Pixels per em.
    pub em: f32,
    /// Pixels per ex.
    pub ex: f32,
    /// Width of the containing block in pixels; governs line breaking.
    pub container_width: f32,
}

impl Default for TypesetOptions {
    fn default() -> Self {
        Self {
            display: true,
            em: 16.0,
            ex: 8.0,
            container_width: 80.0 * 16.0,
        }
    }
}

/// A typesetting engine turning TeX markup into SVG text.
///
/// Implementations report markup problems as [`MathpaintError::Typeset`] carrying the engine's
/// own diagnostic text.
///
/// [`MathpaintError::Typeset`]: crate::MathpaintError::Typeset
pub trait TypesetBackend: Send + Sync {
    /// Typeset `markup` into an SVG document.
    fn typeset(&self, markup: &str, opts: &TypesetOptions) -> MathpaintResult<String>;

    /// Whether concurrent `typeset` calls are safe. When `false`, callers serialize them.
    fn is_concurrent_safe(&self) -> bool {
        true
    }
}

/// Adapts a closure into a [`TypesetBackend`].
pub struct FnBackend<F> {
    f: F,
    concurrent_safe: bool,
}

impl<F> FnBackend<F>
where
    F: Fn(&str, &TypesetOptions) -> MathpaintResult<String> + Send + Sync,
{
    /// Wrap `f`, declaring it safe for concurrent use.
    pub fn new(f: F) -> Self {
        Self {
            f,
            concurrent_safe: true,
        }
    }

    /// Wrap `f`, requiring callers to serialize invocations.
    pub fn exclusive(f: F) -> Self {
        Self {
            f,
            concurrent_safe: false,
        }
    }
}

impl<F> TypesetBackend for FnBackend<F>
where
    F: Fn(&str, &TypesetOptions) -> MathpaintResult<String> + Send + Sync,
{
    fn typeset(&self, markup: &str, opts: &TypesetOptions) -> MathpaintResult<String> {
        (self.f)(markup, opts)
    }

    fn is_concurrent_safe(&self) -> bool {
        self.concurrent_safe
    }
}
