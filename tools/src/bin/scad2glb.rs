//! Render an OpenSCAD model into a GLB preview

use anyhow::{Context, Result};
use clap::Parser;
use scadview_render::{render_preview, OpenScadCli, RenderConfig, ScadValue};
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "scad2glb", version, about = "Render an OpenSCAD model into a GLB preview")]
struct Args {
    /// Model to render
    model: PathBuf,

    /// Directory for the intermediate OFF file and the preview
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// File name of the preview inside the output directory
    #[arg(long, default_value = "preview.glb")]
    name: String,

    /// JSON render configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Library directory searched before OPENSCADPATH
    #[arg(long)]
    library_dir: Option<PathBuf>,

    /// Extra variable definitions as name=number, name=true or name=text
    #[arg(short = 'D', value_name = "NAME=VALUE")]
    define: Vec<String>,
}

fn parse_define(define: &str) -> Result<(String, ScadValue)> {
    let (name, raw) = define
        .split_once('=')
        .with_context(|| format!("define {:?} is not NAME=VALUE", define))?;
    let value = match raw {
        "true" => ScadValue::Bool(true),
        "false" => ScadValue::Bool(false),
        _ => raw
            .parse::<f64>()
            .map(ScadValue::Number)
            .unwrap_or_else(|_| ScadValue::String(raw.to_string())),
    };
    Ok((name.to_string(), value))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let mut config = match &args.config {
        Some(path) => RenderConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => RenderConfig::default(),
    };
    for define in &args.define {
        let (name, value) = parse_define(define)?;
        config = config.with_define(name, value);
    }

    let mut engine = OpenScadCli::new();
    if let Some(dir) = &args.library_dir {
        engine = engine.with_library_dir(dir);
    }

    std::fs::create_dir_all(&args.out_dir)
        .with_context(|| format!("creating {}", args.out_dir.display()))?;
    let preview = render_preview(&engine, &args.model, &args.out_dir, &args.name, &config)
        .with_context(|| format!("rendering {}", args.model.display()))?;
    info!("Preview written to {}", preview.display());
    Ok(())
}
