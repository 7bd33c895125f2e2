use std::sync::Barrier;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use super::*;
use crate::foundation::error::MathpaintError;
use crate::typeset::backend::{FnBackend, TypesetOptions};

const THREADS: usize = 8;

fn echo_backend() -> Arc<dyn TypesetBackend> {
    Arc::new(FnBackend::new(|markup: &str, _: &TypesetOptions| {
        Ok(format!("<svg>{markup}</svg>"))
    }))
}

/// Backend that records the peak number of overlapping calls.
struct OverlapProbe {
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    concurrent_safe: bool,
}

impl OverlapProbe {
    fn new(concurrent_safe: bool) -> Self {
        Self {
            in_flight: AtomicUsize::new(0),
            peak: AtomicUsize::new(0),
            concurrent_safe,
        }
    }
}

impl TypesetBackend for OverlapProbe {
    fn typeset(&self, _markup: &str, _opts: &TypesetOptions) -> MathpaintResult<String> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        std::thread::sleep(Duration::from_millis(5));
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok("<svg/>".to_string())
    }

    fn is_concurrent_safe(&self) -> bool {
        self.concurrent_safe
    }
}

fn hammer(svc: &TypesetService) {
    let barrier = Barrier::new(THREADS);
    std::thread::scope(|s| {
        for _ in 0..THREADS {
            s.spawn(|| {
                barrier.wait();
                for _ in 0..3 {
                    svc.typeset("x").unwrap();
                }
            });
        }
    });
}

#[test]
fn backend_is_built_lazily() {
    let svc = TypesetService::with_factory(TypesetConfig::default(), |_| echo_backend());
    assert!(!svc.is_initialized());
    assert_eq!(svc.typeset("a").unwrap(), "<svg>a</svg>");
    assert!(svc.is_initialized());
}

#[test]
fn concurrent_first_use_initializes_once() {
    let builds = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&builds);
    let svc = TypesetService::with_factory(TypesetConfig::default(), move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        echo_backend()
    });

    hammer(&svc);
    assert_eq!(builds.load(Ordering::SeqCst), 1);
}

#[test]
fn injected_backend_is_ready() {
    let svc = TypesetService::with_backend(TypesetConfig::default(), echo_backend());
    assert!(svc.is_initialized());
    assert_eq!(svc.typeset("b").unwrap(), "<svg>b</svg>");
}

#[test]
fn unsafe_backend_calls_never_overlap() {
    let probe = Arc::new(OverlapProbe::new(false));
    let svc = TypesetService::with_backend(TypesetConfig::default(), probe.clone());
    hammer(&svc);
    assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
}

#[test]
fn serialize_calls_config_forces_single_flight() {
    let probe = Arc::new(OverlapProbe::new(true));
    let cfg = TypesetConfig {
        serialize_calls: true,
        ..TypesetConfig::default()
    };
    let svc = TypesetService::with_backend(cfg, probe.clone());
    hammer(&svc);
    assert_eq!(probe.peak.load(Ordering::SeqCst), 1);
}

#[test]
fn layout_options_are_forwarded() {
    let cfg = TypesetConfig {
        layout: TypesetOptions {
            container_width: 640.0,
            ..TypesetOptions::default()
        },
        ..TypesetConfig::default()
    };
    let backend = Arc::new(FnBackend::new(|_: &str, opts: &TypesetOptions| {
        Ok(format!("{}", opts.container_width))
    }));
    let svc = TypesetService::with_backend(cfg, backend);
    assert_eq!(svc.typeset("x").unwrap(), "640");
}

#[test]
fn backend_errors_pass_through() {
    let backend = Arc::new(FnBackend::new(|_: &str, _: &TypesetOptions| {
        Err(MathpaintError::typeset("Undefined control sequence"))
    }));
    let svc = TypesetService::with_backend(TypesetConfig::default(), backend);
    let err = svc.typeset("\\nope").unwrap_err();
    assert!(matches!(err, MathpaintError::Typeset(_)));
}
