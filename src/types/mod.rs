//! Data model shared by the analyzer, the decision engine and the CLI.

mod core;
mod metric_results;
mod report;

pub use self::core::{DpiSource, InputKind};
pub use metric_results::{
    BorderMetric, ColorMetric, ContrastMetric, ExposureMetric, MetricResult, NoiseMetric,
    ResolutionMetric, SharpnessMetric, SkewMetric, TextCoverageMetric,
};
pub use report::{FailureReason, FileReport, PageFailure, PageReport, QualityStatus, Verdict};
