use std::io::Write as _;
use std::process::{Command, Stdio};

use anyhow::anyhow;

use crate::foundation::error::{MathpaintError, MathpaintResult};
use crate::typeset::backend::{TypesetBackend, TypesetOptions};
use crate::typeset::config::{SvgOutputConfig, TexInputConfig, TypesetConfig};

/// Request written to the bridge's stdin.
#[derive(Debug, serde::Serialize)]
struct BridgeRequest<'a> {
    markup: &'a str,
    options: &'a TypesetOptions,
    tex: &'a TexInputConfig,
    svg: &'a SvgOutputConfig,
}

/// Backend that spawns an external bridge program for each call.
///
/// The bridge receives one JSON object on stdin:
///
/// ```json
/// {"markup": "...", "options": {"display": true, "em": 16, "ex": 8, "containerWidth": 1280},
///  "tex": {"packages": [], "inlineMath": [["$", "$"]], "displayMath": [["$$", "$$"]], "processEscapes": true},
///  "svg": {"fontCache": "none"}}
/// ```
///
/// It must print the SVG to stdout and exit 0, or print a diagnostic to stderr and exit non-zero.
/// Each call runs in its own process, so calls never share interpretation state.
#[derive(Clone, Debug)]
pub struct CommandBackend {
    config: TypesetConfig,
}

impl CommandBackend {
    /// Create a backend from `config`. Nothing is spawned until the first call.
    pub fn new(config: TypesetConfig) -> Self {
        Self { config }
    }
}

impl TypesetBackend for CommandBackend {
    fn typeset(&self, markup: &str, opts: &TypesetOptions) -> MathpaintResult<String> {
        let request = BridgeRequest {
            markup,
            options: opts,
            tex: &self.config.tex,
            svg: &self.config.svg,
        };
        let payload = serde_json::to_vec(&request)
            .map_err(|e| anyhow!("serialize typeset request: {e}"))?;

        let mut child = Command::new(&self.config.command)
            .args(&self.config.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                anyhow!(
                    "failed to spawn typeset command '{}' (is it installed and on PATH?): {e}",
                    self.config.command
                )
            })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("failed to open typeset command stdin (unexpected)"))?;
        // Feed stdin from a separate thread so a chatty bridge cannot deadlock on a full pipe.
        let writer = std::thread::spawn(move || stdin.write_all(&payload));

        let output = child
            .wait_with_output()
            .map_err(|e| anyhow!("failed to wait for typeset command: {e}"))?;
        let write_result = writer
            .join()
            .map_err(|_| anyhow!("typeset stdin writer thread panicked"))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let diag = stderr.trim();
            tracing::debug!(status = %output.status, "typeset command failed");
            return Err(MathpaintError::typeset(if diag.is_empty() {
                format!("typeset command exited with status {}", output.status)
            } else {
                diag.to_string()
            }));
        }
        write_result.map_err(|e| anyhow!("failed to write typeset request: {e}"))?;

        String::from_utf8(output.stdout)
            .map_err(|e| MathpaintError::typeset(format!("typeset output is not UTF-8: {e}")))
    }
}

/// Return `true` when `command` can be spawned from `PATH`.
pub fn is_command_on_path(command: &str) -> bool {
    Command::new(command)
        .arg("--version")
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .is_ok()
}

#[cfg(test)]
#[path = "../../tests/unit/typeset/command.rs"]
mod tests;
