//! Convert an OpenSCAD OFF export into a binary glTF scene

use anyhow::{Context, Result};
use clap::Parser;
use scadview_io::{parse_off, read_glb, GlbExportOptions, GlbExporter};
use std::fs;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "off2glb", version, about = "Convert an OFF polyhedron into a GLB scene")]
struct Args {
    /// OFF file to convert
    input: PathBuf,

    /// Output path (defaults to the input with a .glb extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write per-vertex COLOR_0
    #[arg(long)]
    vertex_colors: bool,

    /// Leave the directional lights out of the scene
    #[arg(long)]
    no_lights: bool,

    /// Print a summary of the written scene
    #[arg(long)]
    summary: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let args = Args::parse();
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.input.with_extension("glb"));

    let text = fs::read_to_string(&args.input)
        .with_context(|| format!("reading {}", args.input.display()))?;
    let polyhedron = parse_off(&text).with_context(|| format!("parsing {}", args.input.display()))?;

    let options = GlbExportOptions::default()
        .with_vertex_colors(args.vertex_colors)
        .with_lights(!args.no_lights);
    let bytes = GlbExporter::new(options)
        .export(&polyhedron)
        .context("exporting scene")?;
    fs::write(&output, &bytes).with_context(|| format!("writing {}", output.display()))?;
    info!("Wrote {} ({} bytes)", output.display(), bytes.len());

    if args.summary {
        let glb = read_glb(&bytes).context("reading back scene")?;
        let document = &glb.document;
        println!("vertices:   {}", polyhedron.vertex_count());
        println!("triangles:  {}", polyhedron.face_count());
        println!("colors:     {}", polyhedron.color_count());
        if let Some((min, max)) = polyhedron.bounding_box() {
            println!(
                "bounds:     [{}, {}, {}] .. [{}, {}, {}]",
                min.x, min.y, min.z, max.x, max.y, max.z
            );
        }
        println!("primitives: {}", document.meshes.iter().map(|m| m.primitives.len()).sum::<usize>());
        println!("nodes:      {}", document.nodes.len());
        println!("binary:     {} bytes", glb.bin.len());
    }

    Ok(())
}
