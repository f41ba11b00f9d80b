//! Rasterization of paged (PDF) documents.
//!
//! Pages are rendered with pdfium at the requested DPI, so born-digital text,
//! vector art and every image encoding pdfium understands come out the way a
//! viewer would draw them. The pdfium library is bound once per process.

use std::path::Path;
use std::sync::OnceLock;

use image::{DynamicImage, RgbaImage};
use pdfium_render::prelude::*;
use tracing::{debug, info, instrument};

use crate::error::{DqcError, Result};
use crate::image_loader::DecodedImage;
use crate::types::DpiSource;

/// PDF user-space units per inch.
const POINTS_PER_INCH: f32 = 72.0;

static PDFIUM: OnceLock<std::result::Result<Pdfium, String>> = OnceLock::new();

/// The process-wide pdfium instance.
///
/// Lookup order: `library_dir` (first caller wins), the working directory,
/// then the system library path.
pub fn pdfium(library_dir: Option<&Path>) -> Result<&'static Pdfium> {
    PDFIUM
        .get_or_init(|| {
            let bindings = match library_dir {
                Some(dir) => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(dir)),
                None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
                    .or_else(|_| Pdfium::bind_to_system_library()),
            };
            bindings
                .map(Pdfium::new)
                .map_err(|err| format!("{err:?}"))
        })
        .as_ref()
        .map_err(|message| DqcError::Renderer(message.clone()))
}

/// A loaded paged document.
pub struct PagedDocument {
    document: PdfDocument<'static>,
    path: String,
}

impl PagedDocument {
    /// Load a PDF from disk. Unreadable or corrupt files are decode errors.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn open(path: &Path, library_dir: Option<&Path>) -> Result<Self> {
        let pdfium = pdfium(library_dir)?;
        let document = pdfium.load_pdf_from_file(path, None).map_err(|err| {
            DqcError::decode(path.display().to_string(), format!("invalid PDF: {err:?}"))
        })?;
        info!(pages = document.pages().len() as u32, "PDF loaded");

        Ok(Self {
            document,
            path: path.display().to_string(),
        })
    }

    pub fn page_count(&self) -> u32 {
        self.document.pages().len() as u32
    }

    /// Render a 1-indexed page at `dpi`.
    #[instrument(skip(self), fields(path = %self.path))]
    pub fn rasterize_page(&self, page: u32, dpi: u32) -> Result<DecodedImage> {
        let index = (1..=self.page_count())
            .contains(&page)
            .then(|| PdfPageIndex::try_from(page - 1).ok())
            .flatten()
            .ok_or_else(|| DqcError::decode(&self.path, format!("page {page} out of range")))?;
        let pdf_page = self.document.pages().get(index).map_err(|err| {
            DqcError::decode(&self.path, format!("page {page} cannot be loaded: {err:?}"))
        })?;

        let config = PdfRenderConfig::new().scale_page_by_factor(dpi as f32 / POINTS_PER_INCH);
        let bitmap = pdf_page.render_with_config(&config).map_err(|err| {
            DqcError::decode(&self.path, format!("page {page} cannot be rendered: {err:?}"))
        })?;

        let (width, height) = (bitmap.width() as u32, bitmap.height() as u32);
        debug!(
            page,
            width_pt = pdf_page.width().value,
            height_pt = pdf_page.height().value,
            width,
            height,
            "page rendered"
        );
        let rgba = RgbaImage::from_raw(width, height, bitmap.as_rgba_bytes()).ok_or_else(|| {
            DqcError::decode(&self.path, format!("page {page} produced an invalid bitmap"))
        })?;

        Ok(DecodedImage::from_dynamic(
            DynamicImage::ImageRgba8(rgba),
            dpi as f64,
            DpiSource::Rasterized,
        ))
    }
}
