use std::{
    io::{BufRead as _, Read as _, Write as _},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(name = "mathpaint", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one expression to an image file (or a data URI on stdout).
    Render(RenderArgs),
    /// List the built-in sample expressions.
    Samples,
    /// Answer JSON render requests, one per stdin line, with one JSON response per stdout line.
    Rpc(RpcArgs),
}

#[derive(clap::Args, Debug)]
struct BackendArgs {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the typeset bridge command.
    #[arg(long)]
    backend_cmd: Option<String>,

    /// Extra argument for the bridge command (repeatable).
    #[arg(long = "backend-arg", allow_hyphen_values = true)]
    backend_args: Vec<String>,
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// TeX markup. Use `-` to read it from stdin.
    #[arg(required_unless_present = "sample")]
    markup: Option<String>,

    /// Render a built-in sample instead (slug or 1-based index).
    #[arg(long, conflicts_with = "markup")]
    sample: Option<String>,

    /// Output format.
    #[arg(long, value_enum, default_value_t = FormatArg::Png)]
    format: FormatArg,

    /// Outline glyphs with `--border-color`.
    #[arg(long)]
    border: bool,

    /// Glyph fill color.
    #[arg(long, value_enum, default_value_t = ColorArg::Black)]
    font_color: ColorArg,

    /// Border color (only used with `--border`).
    #[arg(long, value_enum, default_value_t = ColorArg::Black)]
    border_color: ColorArg,

    /// Output file or directory. Defaults to `latex-formula.<ext>` in the working directory.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Also write the recolored SVG here.
    #[arg(long)]
    svg_out: Option<PathBuf>,

    /// Print the data URI to stdout instead of writing an image file.
    #[arg(long)]
    data_url: bool,

    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Parser, Debug)]
struct RpcArgs {
    #[command(flatten)]
    backend: BackendArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatArg {
    Png,
    Jpg,
}

impl From<FormatArg> for mathpaint::OutputFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => Self::Png,
            FormatArg::Jpg => Self::Jpeg,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ColorArg {
    Black,
    White,
}

impl From<ColorArg> for mathpaint::InkColor {
    fn from(v: ColorArg) -> Self {
        match v {
            ColorArg::Black => Self::Black,
            ColorArg::White => Self::White,
        }
    }
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Samples => cmd_samples(),
        Command::Rpc(args) => cmd_rpc(args),
    }
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn make_renderer(args: &BackendArgs) -> anyhow::Result<mathpaint::Renderer> {
    let mut cfg = match &args.config {
        Some(path) => mathpaint::MathpaintConfig::from_path(path)?,
        None => mathpaint::MathpaintConfig::default(),
    };
    if let Some(cmd) = &args.backend_cmd {
        cfg.typeset.command = cmd.clone();
    }
    if !args.backend_args.is_empty() {
        cfg.typeset.args = args.backend_args.clone();
    }
    cfg.validate()?;

    let typesetter = Arc::new(mathpaint::TypesetService::new(cfg.typeset));
    warn_if_bridge_missing(&typesetter.config().command);
    Ok(mathpaint::Renderer::new(typesetter).with_raster_opts(cfg.raster))
}

/// Requests still get answered without a bridge (blank markup never reaches it), so this only warns.
fn warn_if_bridge_missing(command: &str) {
    if !mathpaint::is_command_on_path(command) {
        tracing::warn!(
            command,
            "typeset bridge '{command}' not found on PATH; install the bundled one with `npm install -g ./bridge`"
        );
    }
}

fn read_markup(args: &RenderArgs) -> anyhow::Result<String> {
    if let Some(key) = &args.sample {
        let sample = mathpaint::find_sample(key)
            .with_context(|| format!("unknown sample '{key}' (see `mathpaint samples`)"))?;
        return Ok(sample.markup.to_string());
    }
    match args.markup.as_deref() {
        Some("-") => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("read markup from stdin")?;
            Ok(buf)
        }
        Some(m) => Ok(m.to_string()),
        None => anyhow::bail!("no markup given"),
    }
}

fn output_path(out: Option<&Path>, format: mathpaint::OutputFormat) -> PathBuf {
    let name = mathpaint::suggested_file_name(format);
    match out {
        Some(p) if p.is_dir() => p.join(name),
        Some(p) => p.to_path_buf(),
        None => PathBuf::from(name),
    }
}

fn write_file(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, bytes).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let renderer = make_renderer(&args.backend)?;
    let req = mathpaint::RenderRequest {
        markup: read_markup(&args)?,
        format: args.format.into(),
        with_border: args.border,
        font_color: args.font_color.into(),
        border_color: args.border_color.into(),
    };

    let rendered = match renderer.render(&req) {
        Ok(r) => r,
        Err(err) => anyhow::bail!("{}", err.user_message()),
    };

    if let Some(svg_out) = &args.svg_out {
        write_file(svg_out, rendered.svg.as_bytes())?;
        eprintln!("wrote {}", svg_out.display());
    }

    if args.data_url {
        println!("{}", rendered.data_url());
        return Ok(());
    }

    let out = output_path(args.out.as_deref(), req.format);
    write_file(&out, &rendered.image.bytes)?;
    eprintln!(
        "wrote {} ({}x{})",
        out.display(),
        rendered.image.width,
        rendered.image.height
    );
    Ok(())
}

fn cmd_samples() -> anyhow::Result<()> {
    let mut stdout = std::io::stdout().lock();
    for (i, s) in mathpaint::SAMPLES.iter().enumerate() {
        writeln!(stdout, "{:>2}  {:<18} {:<26} {}", i + 1, s.slug, s.title, s.markup)?;
    }
    Ok(())
}

fn cmd_rpc(args: RpcArgs) -> anyhow::Result<()> {
    let renderer = make_renderer(&args.backend)?;
    let stdin = std::io::stdin().lock();
    let mut stdout = std::io::stdout().lock();

    for line in stdin.lines() {
        let line = line.context("read request line")?;
        if line.trim().is_empty() {
            continue;
        }
        let resp = match serde_json::from_str::<mathpaint::RenderRequest>(&line) {
            Ok(req) => renderer.respond(&req),
            Err(e) => mathpaint::RenderResponse::failure(format!("invalid request: {e}")),
        };
        serde_json::to_writer(&mut stdout, &resp).context("write response")?;
        writeln!(stdout)?;
        stdout.flush()?;
    }
    Ok(())
}
