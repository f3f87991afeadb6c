mod script;

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use clap::Parser;
use sketchcore::bounds::Bounds;
use sketchcore::config::EditorConfig;
use sketchcore::{App, EditorError, SerializedApp};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("cannot read {path}: {source}")]
    Io { path: String, source: io::Error },
    #[error("invalid JSON in {path}: {source}")]
    Json { path: String, source: serde_json::Error },
    #[error("script line {line}: {source}")]
    Script { line: usize, source: serde_json::Error },
    #[error("script line {line} rejected: {source}")]
    Step { line: usize, source: EditorError },
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error("output encoding failed: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Viewport size in screen pixels, written `WIDTHxHEIGHT`.
#[derive(Debug, Clone, Copy)]
struct Viewport {
    width: f64,
    height: f64,
}

impl FromStr for Viewport {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let (w, h) = raw.split_once('x').ok_or_else(|| format!("expected WIDTHxHEIGHT, got {raw}"))?;
        let parse = |v: &str| v.trim().parse::<f64>().map_err(|e| format!("{v}: {e}"));
        Ok(Self { width: parse(w)?, height: parse(h)? })
    }
}

#[derive(Parser, Debug)]
#[command(name = "sketch-cli", about = "Replay an input script against a sketch document")]
struct Cli {
    #[arg(long, env = "SKETCH_DOCUMENT", help = "Serialized app to start from; an empty page when omitted")]
    document: Option<PathBuf>,

    #[arg(long, env = "SKETCH_SCRIPT", default_value = "-", help = "Event script (JSON lines), or - for stdin")]
    script: String,

    #[arg(long, env = "SKETCH_CONFIG", help = "Editor config as a JSON file")]
    config: Option<PathBuf>,

    #[arg(long, env = "SKETCH_DRAG_THRESHOLD", help = "Overrides the config's drag threshold (screen px)")]
    drag_threshold: Option<f64>,

    #[arg(long, env = "SKETCH_VIEWPORT", default_value = "1280x720")]
    viewport: Viewport,

    #[arg(long, default_value_t = false)]
    pretty: bool,

    #[arg(long, default_value_t = false, help = "Print each step's changes to stderr")]
    changes: bool,
}

fn main() -> Result<(), CliError> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).with_writer(io::stderr).init();
    let cli = Cli::parse();

    let mut app = build_app(&cli)?;
    app.set_viewport_bounds(Bounds::from_rect(0.0, 0.0, cli.viewport.width, cli.viewport.height));
    replay(&mut app, &cli)?;

    let doc = app.serialized();
    let rendered = if cli.pretty { serde_json::to_string_pretty(&doc)? } else { serde_json::to_string(&doc)? };
    println!("{rendered}");
    Ok(())
}

fn read(path: &Path) -> Result<String, CliError> {
    fs::read_to_string(path).map_err(|source| CliError::Io { path: path.display().to_string(), source })
}

fn build_app(cli: &Cli) -> Result<App, CliError> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = read(path)?;
            serde_json::from_str::<EditorConfig>(&raw).map_err(|source| CliError::Json { path: path.display().to_string(), source })?
        }
        None => EditorConfig::default(),
    };
    if let Some(threshold) = cli.drag_threshold {
        config.drag_threshold_px = threshold;
    }

    let mut builder = App::builder().config(config);
    if let Some(path) = &cli.document {
        let raw = read(path)?;
        let doc: SerializedApp = serde_json::from_str(&raw).map_err(|source| CliError::Json { path: path.display().to_string(), source })?;
        info!(path = %path.display(), pages = doc.pages.len(), "loaded document");
        builder = builder.document(doc);
    }
    Ok(builder.build()?)
}

fn replay(app: &mut App, cli: &Cli) -> Result<(), CliError> {
    let reader: Box<dyn BufRead> = if cli.script == "-" {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let file = File::open(&cli.script).map_err(|source| CliError::Io { path: cli.script.clone(), source })?;
        Box::new(BufReader::new(file))
    };

    let mut steps = 0_usize;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| CliError::Io { path: cli.script.clone(), source })?;
        let Some(step) = script::parse_line(&line).map_err(|source| CliError::Script { line: line_no, source })? else {
            continue;
        };
        debug!(line = line_no, ?step, "replay");
        let changes = script::apply(app, step).map_err(|source| CliError::Step { line: line_no, source })?;
        if cli.changes {
            eprintln!("{line_no}: {}", serde_json::to_string(&changes)?);
        }
        steps = steps.saturating_add(1);
    }
    info!(steps, state = %app.state_path(), "replay complete");
    Ok(())
}
