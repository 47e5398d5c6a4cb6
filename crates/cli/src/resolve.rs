use anyhow::Context;
use clap::{Parser, ValueEnum};
use mapfields_core::{ArtifactResolver, Resolved};
use serde_json::{json, Value};
use std::fs;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mapfields-resolve")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Classify artifact references by probing path segments")]
#[command(long_about = "Resolves slash-separated artifact references against a base directory: \
    directory segments are probed shallow-to-deep, and the final segment is tested against a \
    primary and a secondary file extension. Each reference classifies as primary, secondary, or \
    missing.")]
pub struct Args {
    /// Base directory to resolve against
    pub base: PathBuf,

    /// References to resolve (slash-separated)
    pub references: Vec<String>,

    /// File with one reference per line
    #[arg(long)]
    pub refs_file: Option<PathBuf>,

    /// Primary candidate extension
    #[arg(long, default_value = "gts")]
    pub primary_ext: String,

    /// Secondary candidate extension
    #[arg(long, default_value = "tsq")]
    pub secondary_ext: String,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Summary)]
    pub format: FormatArg,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum FormatArg {
    Json,
    Summary,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut references = args.references.clone();
    if let Some(path) = &args.refs_file {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        references.extend(
            content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string),
        );
    }
    if references.is_empty() {
        anyhow::bail!("no references given (positional arguments or --refs-file)");
    }

    let resolver = ArtifactResolver::new(&args.base)
        .with_extensions(&args.primary_ext, &args.secondary_ext);
    let results = resolver.resolve_all(references.iter().map(String::as_str));

    let output = match args.format {
        FormatArg::Json => to_json(&results)?,
        FormatArg::Summary => to_summary(&results),
    };

    if let Some(path) = args.output {
        fs::write(&path, &output)?;
    } else {
        println!("{}", output);
    }

    Ok(())
}

fn to_json(results: &[(String, Resolved)]) -> anyhow::Result<String> {
    let entries: Vec<Value> = results
        .iter()
        .map(|(reference, resolved)| {
            let mut entry = json!({
                "reference": reference,
                "kind": resolved.kind(),
                "path": resolved.path().display().to_string(),
            });
            if let Resolved::Missing { missing, .. } = resolved {
                entry["missing"] = json!(missing);
            }
            entry
        })
        .collect();
    Ok(serde_json::to_string_pretty(&entries)?)
}

fn to_summary(results: &[(String, Resolved)]) -> String {
    let mut out = String::new();
    let found = results.iter().filter(|(_, r)| r.is_found()).count();
    out.push_str(&format!(
        "Resolved {} of {} references\n\n",
        found,
        results.len()
    ));
    for (reference, resolved) in results {
        out.push_str(&format!(
            "  [{}] {} -> {}\n",
            resolved.kind(),
            reference,
            resolved.path().display()
        ));
    }
    out
}
