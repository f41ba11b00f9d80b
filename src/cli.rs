use clap::{Args, Parser, Subcommand, ValueEnum};
use dqc_lib::{InputKind, ReductionPolicy};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "dqc")]
#[command(
    version,
    about = "Document Quality Checker - Decide whether scanned documents are fit for OCR",
    long_about = "Document Quality Checker (DQC)\n\nModes:\n- analyze: full per-page quality report plus pass/fail verdict.\n- check: verdict only; exit code 0 on pass, 1 on fail.\n- batch: verdict for every supported file in a folder.\n\nFatal errors exit with code 2. Use --help on any subcommand for details."
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        global = true,
        value_name = "PATH",
        help = "Optional config file (TOML) to set defaults for thresholds/DPI/policy/timeouts; CLI flags override config"
    )]
    pub config: Option<PathBuf>,

    #[arg(long, global = true, value_enum, default_value = "json", help = "Output format")]
    pub format: OutputFormat,

    #[arg(long, short, global = true, help = "Output file path (stdout if omitted)")]
    pub output: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        value_name = "SECS",
        help = "Abort analysis after this many seconds (default from config: 120)"
    )]
    pub timeout: Option<u64>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Full quality report for one file
    Analyze {
        #[arg(long, help = "Input document (PNG, JPEG, TIFF, BMP, WebP or PDF)")]
        input: PathBuf,

        #[arg(long, value_enum, help = "Override type detection for input")]
        input_type: Option<InputType>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Pass/fail verdict for one file
    Check {
        #[arg(long, help = "Input document (PNG, JPEG, TIFF, BMP, WebP or PDF)")]
        input: PathBuf,

        #[arg(long, value_enum, help = "Override type detection for input")]
        input_type: Option<InputType>,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },

    /// Verdict for every supported file in a folder (non-recursive)
    Batch {
        #[arg(long, value_name = "PATH", help = "Folder of documents to check")]
        dir: PathBuf,

        #[command(flatten)]
        analysis: AnalysisArgs,
    },
}

/// Flags shared by every analysis mode.
#[derive(Args, Clone, Debug, Default)]
pub struct AnalysisArgs {
    #[arg(
        long,
        value_name = "DPI",
        help = "Declared scan resolution for raster inputs; enables the resolution check"
    )]
    pub dpi: Option<f64>,

    #[arg(
        long,
        value_name = "DPI",
        help = "Rasterization resolution for PDF pages (default from config: 200)"
    )]
    pub pdf_dpi: Option<u32>,

    #[arg(long, value_enum, help = "How page verdicts combine for multi-page documents")]
    pub policy: Option<Policy>,

    #[arg(long, help = "Analyze metrics and pages on a single thread")]
    pub sequential: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum InputType {
    Raster,
    Pdf,
}

impl From<InputType> for InputKind {
    fn from(value: InputType) -> Self {
        match value {
            InputType::Raster => InputKind::Raster,
            InputType::Pdf => InputKind::Paged,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum Policy {
    AllPagesMustPass,
    FirstPageOnly,
}

impl From<Policy> for ReductionPolicy {
    fn from(value: Policy) -> Self {
        match value {
            Policy::AllPagesMustPass => ReductionPolicy::AllPagesMustPass,
            Policy::FirstPageOnly => ReductionPolicy::FirstPageOnly,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Json,
    Pretty,
}

pub fn parse() -> Cli {
    Cli::parse()
}
