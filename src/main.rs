// main.rs
//
// Builds the table described by a TOML file (or the built-in example) and
// writes it as STL.

use anyhow::Context;
use clap::Parser;
use insertcsg::config::BuildConfig;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about = "Generate a table with legs and heat-set insert sockets")]
struct Args {
    /// TOML build description; the example table is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output STL path, overriding the config
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Write ASCII STL instead of binary
    #[arg(long)]
    ascii: bool,

    /// Segments per circle, overriding the config
    #[arg(long)]
    segments: Option<usize>,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => BuildConfig::from_path(path)?,
        None => BuildConfig::default(),
    };
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(segments) = args.segments {
        config.segments = segments;
    }

    let mut table = config.into_table().context("invalid table description")?;
    let solid = table.create().context("could not assemble the table")?;

    if args.ascii {
        let name = config
            .output
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("table");
        std::fs::write(&config.output, solid.to_stl_ascii(name))
            .with_context(|| format!("could not write {}", config.output.display()))?;
    } else {
        solid
            .write_stl(&config.output)
            .with_context(|| format!("could not write {}", config.output.display()))?;
    }

    println!("STL file saved as {}", config.output.display());
    Ok(())
}
