use anyhow::Context;
use clap::Parser;
use mapfields_core::bundle::{bundle_leaf_files, bundle_to_json};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapfields-bundle")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Bundle leaf export files into a single JSON object")]
#[command(long_about = "Collects leaf export files named '<prefix><key>.<ext>' (one identifier \
    per line) from a folder into one JSON object keyed by <key>. Lines are deduplicated while \
    preserving first-seen order.")]
pub struct Args {
    /// Folder containing the leaf export files
    #[arg(default_value = ".")]
    pub dir: PathBuf,

    /// File name prefix selecting the leaf exports
    #[arg(long, default_value = "datafields_")]
    pub prefix: String,

    /// File extension of the leaf exports (without the dot)
    #[arg(long, default_value = "txt")]
    pub extension: String,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show verbose progress
    #[arg(short, long)]
    pub verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let bundle = bundle_leaf_files(&args.dir, &args.prefix, &args.extension)
        .with_context(|| format!("failed to bundle {}", args.dir.display()))?;

    if args.verbose {
        eprintln!("Bundled {} leaf files", bundle.len());
    }

    let json = bundle_to_json(&bundle)?;
    if let Some(path) = args.output {
        fs::write(&path, &json)?;
        if args.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{}", json);
    }

    Ok(())
}
