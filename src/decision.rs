//! Pass/fail decision policy.
//!
//! A page is checked against the thresholds in a fixed priority order and
//! reports only its first failure. A file reduces its pages with a
//! [`ReductionPolicy`].

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Thresholds;
use crate::types::{FailureReason, FileReport, PageFailure, PageReport, QualityStatus, Verdict};

/// How page verdicts combine into a file verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ReductionPolicy {
    /// Any failing page fails the file.
    #[default]
    AllPagesMustPass,
    /// Only page 1 is evaluated.
    FirstPageOnly,
}

/// First failing criterion of a page, or `None` when it passes.
pub fn summarize_page(page: &PageReport, thresholds: &Thresholds) -> Option<FailureReason> {
    if page.text_coverage.too_little_text {
        return Some(FailureReason::InsufficientText);
    }
    if !page.sharpness.passed {
        return Some(FailureReason::NotSharp);
    }
    if !page.skew.passed {
        return Some(FailureReason::Skewed);
    }
    if !page.contrast.passed {
        return Some(FailureReason::LowContrast);
    }
    if !page.exposure.passed() {
        return Some(FailureReason::Exposure);
    }
    // an assumed DPI says nothing about the scan
    if page.resolution.dpi_source.is_known() && page.resolution.dpi < thresholds.dpi_floor {
        return Some(FailureReason::LowResolution);
    }
    if page.border.border_artifacts {
        return Some(FailureReason::ImproperlyCropped);
    }
    None
}

/// Reduce a file report to a single verdict.
pub fn summarize(report: &FileReport, thresholds: &Thresholds, policy: ReductionPolicy) -> Verdict {
    if report.pages.is_empty() {
        return fail_with(FailureReason::NoPages, None, Vec::new());
    }

    let pages = match policy {
        ReductionPolicy::AllPagesMustPass => &report.pages[..],
        ReductionPolicy::FirstPageOnly => &report.pages[..1],
    };

    let failures: Vec<PageFailure> = pages
        .iter()
        .filter_map(|page| {
            summarize_page(page, thresholds).map(|code| PageFailure {
                page: page.page,
                code,
                reason: code.message().to_string(),
            })
        })
        .collect();

    debug!(
        file = %report.file,
        pages = pages.len(),
        failing = failures.len(),
        ?policy,
        "file summarized"
    );

    match failures.first().map(|f| (f.code, f.page)) {
        None => Verdict::pass(),
        Some((code, page)) => fail_with(code, Some(page), failures),
    }
}

fn fail_with(code: FailureReason, page: Option<u32>, failures: Vec<PageFailure>) -> Verdict {
    Verdict {
        status: QualityStatus::Fail,
        reason: Some(code.message().to_string()),
        code: Some(code),
        page,
        failures,
    }
}
