use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::types::InputKind;

/// A classified input file, ready for decoding.
#[derive(Debug, Clone)]
pub struct ParsedInput {
    pub kind: InputKind,
}

#[derive(Debug, Error)]
pub enum InputParseError {
    #[error("Local file not found: {path}. Hint: check the path relative to the current working directory or use an absolute path.")]
    FileNotFound { path: String },
    #[error("Unsupported file extension '{extension}'. Supported extensions: {supported}.")]
    UnsupportedExtension {
        extension: String,
        supported: String,
    },
}

pub const RASTER_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "tif", "tiff", "bmp"];
pub const PAGED_EXTENSIONS: &[&str] = &["pdf"];

pub fn supported_extensions() -> String {
    RASTER_EXTENSIONS
        .iter()
        .chain(PAGED_EXTENSIONS)
        .copied()
        .collect::<Vec<_>>()
        .join(", ")
}

/// Map a file extension onto the closed set of input kinds.
///
/// Returns `None` for anything the pipeline cannot decode.
pub fn kind_for_extension(extension: &str) -> Option<InputKind> {
    let extension = extension.to_ascii_lowercase();
    if RASTER_EXTENSIONS.contains(&extension.as_str()) {
        Some(InputKind::Raster)
    } else if PAGED_EXTENSIONS.contains(&extension.as_str()) {
        Some(InputKind::Paged)
    } else {
        None
    }
}

/// Resolve the input kind from the extension (or the declared kind) without touching the disk.
pub fn classify_input(
    value: &str,
    declared: Option<InputKind>,
) -> Result<InputKind, InputParseError> {
    if let Some(kind) = declared {
        return Ok(kind);
    }

    let extension = Path::new(value)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    kind_for_extension(&extension).ok_or_else(|| InputParseError::UnsupportedExtension {
        extension: if extension.is_empty() {
            "no extension".to_string()
        } else {
            extension
        },
        supported: supported_extensions(),
    })
}

/// Classify the input and check that it names a regular file.
pub fn parse_input(
    value: &str,
    declared: Option<InputKind>,
) -> Result<ParsedInput, InputParseError> {
    let kind = classify_input(value, declared)?;
    let path = Path::new(value);

    let is_file = fs::metadata(path).map(|m| m.is_file()).unwrap_or(false);
    if !is_file {
        return Err(InputParseError::FileNotFound {
            path: path.to_string_lossy().into_owned(),
        });
    }

    Ok(ParsedInput { kind })
}
