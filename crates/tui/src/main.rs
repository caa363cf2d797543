mod renderer;

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use frametrace_core::views::{LayoutParams, TimelineView};
use tracing_subscriber::EnvFilter;

struct Args {
    input: PathBuf,
    svg_out: Option<PathBuf>,
    json_out: Option<PathBuf>,
}

fn usage() -> ! {
    eprintln!("Usage: frametrace [timings.csv] [--svg <out.svg>] [--json <out.json>]");
    eprintln!("Without output flags, opens the interactive viewer.");
    std::process::exit(1);
}

fn parse_args() -> Args {
    let mut input = None;
    let mut svg_out = None;
    let mut json_out = None;

    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--svg" => match args.next() {
                Some(path) => svg_out = Some(PathBuf::from(path)),
                None => usage(),
            },
            "--json" => match args.next() {
                Some(path) => json_out = Some(PathBuf::from(path)),
                None => usage(),
            },
            "-h" | "--help" => usage(),
            _ if arg.starts_with('-') => usage(),
            _ if input.is_none() => input = Some(PathBuf::from(arg)),
            _ => usage(),
        }
    }

    Args {
        input: input.unwrap_or_else(|| PathBuf::from("timings.csv")),
        svg_out,
        json_out,
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args();
    let table = frametrace_core::parsers::load_timings(&args.input)
        .with_context(|| format!("loading {}", args.input.display()))?;
    if table.is_empty() {
        bail!("{}: no timing rows found", args.input.display());
    }

    let params = LayoutParams::default();

    if let Some(path) = &args.json_out {
        let dump = serde_json::to_string_pretty(&table)?;
        std::fs::write(path, dump).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), "wrote timing table dump");
    }

    if let Some(path) = &args.svg_out {
        let mut view = TimelineView::new(&table, params);
        let width = view.scene().content_width().max(1.0).ceil();
        let span_ms = width / params.t_scale;
        view.attach_timescale(0.0, span_ms, 5.0);
        let svg = frametrace_core::svg::render_svg(view.scene(), width, false);
        std::fs::write(path, svg).with_context(|| format!("writing {}", path.display()))?;
        tracing::info!(path = %path.display(), frames = view.scene().groups.len(), "wrote timeline SVG");
    }

    if args.svg_out.is_none() && args.json_out.is_none() {
        renderer::run_viewer(&table, params)?;
    }

    Ok(())
}
