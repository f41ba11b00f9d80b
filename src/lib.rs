//! Document Quality Checker (DQC) Library
//!
//! Decides whether a scanned or photographed document is fit for OCR. Every
//! page is measured independently (sharpness, skew, contrast, exposure, noise,
//! text coverage, colour mode, border whitespace and resolution) and the
//! measurements are reduced to a pass/fail verdict with a reason.
//!
//! # Module Overview
//!
//! - [`input`] - Input classification (raster image or paged document)
//! - [`image_loader`] - Raster decoding into [`DecodedImage`]
//! - [`pdf`] - PDF page rendering (pdfium)
//! - [`metrics`] - Quality metric extractors
//! - [`analysis`] - Per-image and per-file analysis
//! - [`decision`] - Pass/fail policy
//! - [`config`] - Configuration file support
//! - [`types`] - Core data types and structures
//! - [`output`] - JSON output schemas
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use dqc_lib::{analyze_file, summarize, AnalysisOptions, ReductionPolicy};
//!
//! # fn example() -> dqc_lib::Result<()> {
//! let options = AnalysisOptions::default();
//! let report = analyze_file(Path::new("scan.pdf"), None, &options)?;
//! let verdict = summarize(&report, &options.thresholds, ReductionPolicy::AllPagesMustPass);
//! println!("{:?}: {:?}", verdict.status, verdict.reason);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod config;
pub mod decision;
pub mod error;
pub mod image_loader;
pub mod input;
pub mod metrics;
pub mod output;
pub mod pdf;
pub mod types;

pub use analysis::{analyze_file, analyze_image, AnalysisOptions};
pub use config::{Config, Thresholds};
pub use decision::{summarize, summarize_page, ReductionPolicy};
pub use error::{DqcError, Result};
pub use image_loader::{load_raster, DecodedImage};
pub use input::{classify_input, parse_input, ParsedInput};
// Metrics module re-exports
pub use metrics::{
    // Core traits and types
    assemble_page_report, default_metrics, run_metrics, Metric, MetricKind,
    // Concrete metric implementations (for custom configuration)
    BorderCheck, ColorModeCheck, ContrastEstimator, ExposureEstimator, NoiseEstimator,
    ResolutionEstimator, SkewEstimator, TextCoverageEstimator, TextSharpness,
};
pub use output::{
    AnalyzeOutput, BatchEntry, BatchOutput, CheckOutput, DqcOutput, ErrorOutput, InputDescriptor,
    DQC_OUTPUT_VERSION,
};
pub use pdf::PagedDocument;
pub use types::{
    DpiSource, FailureReason, FileReport, InputKind, MetricResult, PageReport, QualityStatus,
    Verdict,
};
