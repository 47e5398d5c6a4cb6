use anyhow::{bail, Context};
use clap::{Parser, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};
use mapfields_core::{
    format_output, parse_column, ExtractConfig, KeySource, LeafRepr, OutputFormat, SchemaExtractor,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "mapfields")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Map schema fields from indentation-encoded spreadsheets")]
#[command(long_about = "Reads spreadsheet rows whose nesting depth is encoded by leading marker \
    characters (e.g. '>', '>>') and reconstructs the nested schema tree. Outputs the tree as an \
    ordered JSON or YAML mapping, a compact bracket form, or the flat deduplicated leaf list. \
    Supports .xlsx, .xlsm, .xlsb, .xls and .ods workbooks.\n\n\
    Point it at a single workbook to write one output, or at a directory to process every \
    workbook found (in parallel) into --output-dir.")]
pub struct Args {
    /// Workbook file or directory to process
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormatArg::Json)]
    pub format: OutputFormatArg,

    /// Output file for single-workbook mode (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output directory for batch mode
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Sheet name to read (defaults to the first sheet)
    #[arg(long)]
    pub sheet: Option<String>,

    /// Header rows to skip before the data starts
    #[arg(long, default_value_t = 2)]
    pub skip_rows: usize,

    /// Element-name column (letter or 0-based index)
    #[arg(long, default_value = "B")]
    pub name_column: String,

    /// Type column (letter or 0-based index)
    #[arg(long, default_value = "C")]
    pub type_column: String,

    /// Depth marker characters (repeatable; defaults to '>' and '/')
    #[arg(long = "marker", action = clap::ArgAction::Append)]
    pub markers: Vec<char>,

    /// Group key selection policy
    #[arg(long, value_enum, default_value_t = KeySourceArg::Type)]
    pub key_source: KeySourceArg,

    /// Leaf rendering in structured output
    #[arg(long, value_enum, default_value_t = LeafReprArg::Null)]
    pub leaf_repr: LeafReprArg,

    /// File patterns for batch discovery (defaults to spreadsheet extensions)
    #[arg(long, action = clap::ArgAction::Append)]
    pub include: Vec<String>,

    /// Show verbose progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Parallel threads for batch mode (0 = auto)
    #[arg(long, default_value_t = 0)]
    pub threads: usize,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Compact,
    Leaves,
    LeavesJson,
    Summary,
}

impl From<OutputFormatArg> for OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => OutputFormat::Json,
            OutputFormatArg::Yaml => OutputFormat::Yaml,
            OutputFormatArg::Compact => OutputFormat::Compact,
            OutputFormatArg::Leaves => OutputFormat::Leaves,
            OutputFormatArg::LeavesJson => OutputFormat::LeavesJson,
            OutputFormatArg::Summary => OutputFormat::Summary,
        }
    }
}

#[derive(ValueEnum, Clone, Debug)]
pub enum KeySourceArg {
    /// Prefer the type column, fall back to the element name
    Type,
    /// Always use the element name
    Name,
}

#[derive(ValueEnum, Clone, Debug)]
pub enum LeafReprArg {
    /// Leaves render as null
    Null,
    /// Leaves render as an empty object
    Empty,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let name_column = parse_column(&args.name_column)
        .with_context(|| format!("invalid name column '{}'", args.name_column))?;
    let type_column = parse_column(&args.type_column)
        .with_context(|| format!("invalid type column '{}'", args.type_column))?;

    let mut config = ExtractConfig::new()
        .with_skip_rows(args.skip_rows)
        .with_columns(name_column, type_column)
        .with_key_source(match args.key_source {
            KeySourceArg::Type => KeySource::Type,
            KeySourceArg::Name => KeySource::Name,
        })
        .with_leaf_repr(match args.leaf_repr {
            LeafReprArg::Null => LeafRepr::NullMarker,
            LeafReprArg::Empty => LeafRepr::EmptyContainer,
        })
        .with_threads(args.threads);

    if let Some(sheet) = args.sheet.clone() {
        config = config.with_sheet(sheet);
    }
    if !args.markers.is_empty() {
        config = config.with_markers(args.markers.clone());
    }

    let leaf_repr = config.leaf_repr;
    let format: OutputFormat = args.format.clone().into();
    let extractor = SchemaExtractor::new(config);

    if args.path.is_dir() {
        run_batch(&extractor, &args, format, leaf_repr)
    } else {
        run_single(&extractor, &args, format, leaf_repr)
    }
}

fn run_single(
    extractor: &SchemaExtractor,
    args: &Args,
    format: OutputFormat,
    leaf_repr: LeafRepr,
) -> anyhow::Result<()> {
    let map = extractor
        .extract(&args.path)
        .with_context(|| format!("failed to process {}", args.path.display()))?;
    let output = format_output(&map, format, leaf_repr)?;

    if let Some(path) = &args.output {
        fs::write(path, &output)?;
        if args.verbose {
            eprintln!("Output written to: {}", path.display());
        }
    } else {
        println!("{}", output);
    }
    Ok(())
}

fn run_batch(
    extractor: &SchemaExtractor,
    args: &Args,
    format: OutputFormat,
    leaf_repr: LeafRepr,
) -> anyhow::Result<()> {
    let output_dir = match (&args.output_dir, format) {
        (Some(dir), _) => Some(dir.clone()),
        // Summaries are readable on stdout; everything else needs files.
        (None, OutputFormat::Summary) => None,
        (None, _) => bail!("batch mode requires --output-dir for this format"),
    };

    let workbooks = extractor.find_workbooks(&args.path, &args.include)?;
    if workbooks.is_empty() {
        bail!("no workbooks found under {}", args.path.display());
    }

    if let Some(dir) = &output_dir {
        fs::create_dir_all(dir)?;
    }

    let spinner = if args.verbose {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap(),
        );
        pb.enable_steady_tick(Duration::from_millis(100));
        pb.set_message(format!("Processing {} workbooks...", workbooks.len()));
        Some(pb)
    } else {
        None
    };

    let results = extractor.extract_batch(&workbooks);

    if let Some(pb) = &spinner {
        pb.finish_with_message(format!("Processed {} workbooks", results.len()));
    }

    let mut failures = 0;
    for (path, result) in &results {
        match result {
            Ok(map) => {
                let output = format_output(map, format, leaf_repr)?;
                match &output_dir {
                    Some(dir) => {
                        let target = derived_name(dir, path, format);
                        fs::write(&target, &output)?;
                        if args.verbose {
                            eprintln!("{} -> {}", path.display(), target.display());
                        }
                    }
                    None => println!("{}", output),
                }
            }
            Err(error) => {
                // One bad document never aborts the batch.
                failures += 1;
                eprintln!("{}: {}", path.display(), error);
            }
        }
    }

    if failures == results.len() {
        bail!("all {} workbooks failed", failures);
    }
    Ok(())
}

/// Derive a batch output file name: `<stem>_<suffix>.<ext>`.
fn derived_name(dir: &Path, source: &Path, format: OutputFormat) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "workbook".to_string());
    let suffix = match format {
        OutputFormat::Json | OutputFormat::Yaml | OutputFormat::Compact => "mapping",
        OutputFormat::Leaves | OutputFormat::LeavesJson => "leaves",
        OutputFormat::Summary => "summary",
    };
    dir.join(format!("{}_{}.{}", stem, suffix, format.extension()))
}
