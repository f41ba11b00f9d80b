//! Per-image and per-file analysis.

use std::path::{Path, PathBuf};

use rayon::prelude::*;
use tracing::{debug, info, instrument};

use crate::config::{Config, Thresholds};
use crate::error::{DqcError, Result};
use crate::image_loader::{load_raster, DecodedImage};
use crate::input::parse_input;
use crate::metrics::{assemble_page_report, default_metrics, run_metrics};
use crate::pdf::PagedDocument;
use crate::types::{DpiSource, FileReport, InputKind, PageReport};

/// Everything a single analysis call needs besides the input path.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisOptions {
    pub thresholds: Thresholds,
    /// Density used for raster inputs without a declared DPI.
    pub assumed_dpi: f64,
    /// Rasterization density for paged documents.
    pub pdf_dpi: u32,
    /// Caller-declared density for raster inputs.
    pub declared_dpi: Option<f64>,
    pub parallel: bool,
    /// Where to look for the pdfium library.
    pub pdfium_dir: Option<PathBuf>,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl AnalysisOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            thresholds: config.thresholds,
            assumed_dpi: config.rendering.assumed_dpi,
            pdf_dpi: config.rendering.pdf_dpi,
            declared_dpi: None,
            parallel: config.parallel,
            pdfium_dir: config.rendering.pdfium_dir.clone(),
        }
    }

    fn raster_dpi(&self) -> (f64, DpiSource) {
        match self.declared_dpi {
            Some(dpi) => (dpi, DpiSource::Declared),
            None => (self.assumed_dpi, DpiSource::Assumed),
        }
    }
}

/// Run every metric over one decoded page.
#[instrument(level = "debug", skip_all, fields(page = page))]
pub fn analyze_image(
    image: &DecodedImage,
    page: u32,
    thresholds: &Thresholds,
    parallel: bool,
) -> Result<PageReport> {
    let metrics = default_metrics();
    let results = run_metrics(&metrics, image, thresholds, parallel);
    assemble_page_report(page, results)
}

/// Classify, decode and analyze a file: one report per page, in page order.
///
/// The input kind comes from `declared` when given, otherwise from the
/// extension. Unsupported types are rejected before the file system is checked.
#[instrument(skip(options), fields(path = %path.display()))]
pub fn analyze_file(
    path: &Path,
    declared: Option<InputKind>,
    options: &AnalysisOptions,
) -> Result<FileReport> {
    let parsed = parse_input(&path.to_string_lossy(), declared)?;
    debug!(kind = %parsed.kind, "input classified");

    let pages = match parsed.kind {
        InputKind::Raster => {
            let (dpi, source) = options.raster_dpi();
            let image = load_raster(path, dpi, source)?;
            vec![analyze_image(&image, 1, &options.thresholds, options.parallel)?]
        }
        InputKind::Paged => analyze_paged(path, options)?,
    };

    info!(kind = %parsed.kind, pages = pages.len(), "file analyzed");
    Ok(FileReport {
        file: path.display().to_string(),
        kind: parsed.kind,
        pages,
    })
}

fn analyze_paged(path: &Path, options: &AnalysisOptions) -> Result<Vec<PageReport>> {
    let document = PagedDocument::open(path, options.pdfium_dir.as_deref())?;
    let count = document.page_count();
    if count == 0 {
        return Err(DqcError::decode(path.display().to_string(), "document has no pages"));
    }
    analyze_pages(
        count,
        |page| document.rasterize_page(page, options.pdf_dpi),
        &options.thresholds,
        options.parallel,
    )
}

/// Render pages `1..=count` with `render` and analyze them; reports come back
/// in page order.
///
/// Rendering stays on the calling thread. In parallel mode pages are rendered
/// in batches of one per worker and each batch is analyzed on the rayon pool.
fn analyze_pages<F>(
    count: u32,
    mut render: F,
    thresholds: &Thresholds,
    parallel: bool,
) -> Result<Vec<PageReport>>
where
    F: FnMut(u32) -> Result<DecodedImage>,
{
    if !parallel {
        return (1..=count)
            .map(|page| {
                let image = render(page)?;
                analyze_image(&image, page, thresholds, false)
            })
            .collect();
    }

    let pages: Vec<u32> = (1..=count).collect();
    let mut reports = Vec::with_capacity(pages.len());
    for chunk in pages.chunks(rayon::current_num_threads().max(1)) {
        let images = chunk
            .iter()
            .map(|&page| Ok((page, render(page)?)))
            .collect::<Result<Vec<(u32, DecodedImage)>>>()?;
        // indexed collect keeps page order
        let batch = images
            .par_iter()
            .map(|(page, image)| analyze_image(image, *page, thresholds, true))
            .collect::<Result<Vec<_>>>()?;
        reports.extend(batch);
    }
    Ok(reports)
}
