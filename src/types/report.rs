use serde::{Deserialize, Serialize};
use std::fmt;

use super::core::InputKind;
use super::metric_results::{
    BorderMetric, ColorMetric, ContrastMetric, ExposureMetric, NoiseMetric, ResolutionMetric,
    SharpnessMetric, SkewMetric, TextCoverageMetric,
};

/// Every metric computed for one page (or one raster image).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageReport {
    /// 1-indexed page number
    pub page: u32,
    pub sharpness: SharpnessMetric,
    pub skew: SkewMetric,
    pub contrast: ContrastMetric,
    pub resolution: ResolutionMetric,
    pub exposure: ExposureMetric,
    pub noise: NoiseMetric,
    pub text_coverage: TextCoverageMetric,
    pub color: ColorMetric,
    pub border: BorderMetric,
}

/// Per-page reports for one input file, in page order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileReport {
    pub file: String,
    pub kind: InputKind,
    pub pages: Vec<PageReport>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityStatus {
    Pass,
    Fail,
}

/// Why a page failed, in decision priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    InsufficientText,
    NotSharp,
    Skewed,
    LowContrast,
    Exposure,
    LowResolution,
    ImproperlyCropped,
    NoPages,
}

impl FailureReason {
    pub fn message(self) -> &'static str {
        match self {
            FailureReason::InsufficientText => "insufficient text for OCR",
            FailureReason::NotSharp => "text not sharp enough",
            FailureReason::Skewed => "document skew exceeds tolerance",
            FailureReason::LowContrast => "contrast too low / faded text",
            FailureReason::Exposure => "exposure out of range",
            FailureReason::LowResolution => "resolution too low for OCR",
            FailureReason::ImproperlyCropped => "document improperly cropped",
            FailureReason::NoPages => "document has no pages",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageFailure {
    pub page: u32,
    pub code: FailureReason,
    pub reason: String,
}

/// Pass/fail gate for a whole file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub status: QualityStatus,
    /// Human-readable reason of the first failure (page order, then priority)
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<FailureReason>,
    /// Page that supplied `reason`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<PageFailure>,
}

impl Verdict {
    pub fn pass() -> Self {
        Self {
            status: QualityStatus::Pass,
            reason: None,
            code: None,
            page: None,
            failures: Vec::new(),
        }
    }

    pub fn passed(&self) -> bool {
        self.status == QualityStatus::Pass
    }
}
