use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use crate::foundation::error::MathpaintResult;
use crate::typeset::backend::TypesetBackend;
use crate::typeset::command::CommandBackend;
use crate::typeset::config::TypesetConfig;

type BackendFactory = Box<dyn Fn(&TypesetConfig) -> Arc<dyn TypesetBackend> + Send + Sync>;

/// Process-wide typesetting context.
///
/// Holds the long-lived, read-only configuration and the backend built from it. The backend is
/// constructed on first use, exactly once even under concurrent first calls. Calls are
/// serialized through a single gate when the configuration asks for it or the backend is not
/// safe for concurrent use.
pub struct TypesetService {
    config: TypesetConfig,
    factory: BackendFactory,
    backend: OnceLock<Arc<dyn TypesetBackend>>,
    gate: Mutex<()>,
}

impl std::fmt::Debug for TypesetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypesetService")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl TypesetService {
    /// Service backed by a [`CommandBackend`] built lazily from `config`.
    pub fn new(config: TypesetConfig) -> Self {
        Self::with_factory(config, |cfg: &TypesetConfig| -> Arc<dyn TypesetBackend> {
            Arc::new(CommandBackend::new(cfg.clone()))
        })
    }

    /// Service whose backend is built lazily by `factory`.
    pub fn with_factory<F>(config: TypesetConfig, factory: F) -> Self
    where
        F: Fn(&TypesetConfig) -> Arc<dyn TypesetBackend> + Send + Sync + 'static,
    {
        Self {
            config,
            factory: Box::new(factory),
            backend: OnceLock::new(),
            gate: Mutex::new(()),
        }
    }

    /// Service around an already constructed backend.
    pub fn with_backend(config: TypesetConfig, backend: Arc<dyn TypesetBackend>) -> Self {
        let preset = Arc::clone(&backend);
        let svc = Self::with_factory(config, move |_| Arc::clone(&preset));
        let _ = svc.backend.set(backend);
        svc
    }

    /// Configuration of this context.
    pub fn config(&self) -> &TypesetConfig {
        &self.config
    }

    /// Whether the backend has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.backend.get().is_some()
    }

    fn backend(&self) -> &Arc<dyn TypesetBackend> {
        self.backend.get_or_init(|| {
            tracing::info!(command = %self.config.command, "initializing typeset backend");
            (self.factory)(&self.config)
        })
    }

    /// Typeset `markup` with the configured layout.
    pub fn typeset(&self, markup: &str) -> MathpaintResult<String> {
        let backend = self.backend();
        if self.config.serialize_calls || !backend.is_concurrent_safe() {
            let _guard = self.gate.lock().unwrap_or_else(PoisonError::into_inner);
            backend.typeset(markup, &self.config.layout)
        } else {
            backend.typeset(markup, &self.config.layout)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/typeset/service.rs"]
mod tests;
