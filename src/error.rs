use crate::input::InputParseError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DqcError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to decode '{path}': {message}")]
    Decode { path: String, message: String },

    #[error("Unsupported file type '{extension}'. Supported types: {supported}.")]
    UnsupportedFormat {
        extension: String,
        supported: String,
    },

    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF renderer unavailable: {0}")]
    Renderer(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Metric computation error: {0}")]
    Metric(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Analysis timed out after {}s", .0.as_secs())]
    Timeout(Duration),
}

impl DqcError {
    pub fn decode(path: impl Into<String>, message: impl Into<String>) -> Self {
        DqcError::Decode {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn metric(message: impl Into<String>) -> Self {
        DqcError::Metric(message.into())
    }

    pub fn to_payload(&self) -> ErrorPayload {
        match self {
            DqcError::Io(e) => ErrorPayload::new(
                ErrorCategory::Io,
                e.to_string(),
                "Check file paths/permissions.",
            ),
            DqcError::Decode { message, .. } => {
                let lower = message.to_ascii_lowercase();
                let remediation = if lower.contains("not found") {
                    "Verify the file exists; use an absolute path or run from the working directory."
                } else if lower.contains("password") {
                    "Remove the password protection from the PDF before checking it."
                } else {
                    "Verify the file is a readable, uncorrupted image or PDF."
                };
                ErrorPayload::new(ErrorCategory::Decode, self.to_string(), remediation)
            }
            DqcError::UnsupportedFormat { supported, .. } => ErrorPayload::new(
                ErrorCategory::Format,
                self.to_string(),
                format!("Convert the document to one of: {supported}, or override detection with --input-type."),
            ),
            DqcError::Image(e) => ErrorPayload::new(
                ErrorCategory::Decode,
                e.to_string(),
                "Verify image path/format and readability.",
            ),
            DqcError::Renderer(_) => ErrorPayload::new(
                ErrorCategory::Config,
                self.to_string(),
                "Install the pdfium shared library or set rendering.pdfium_dir to the folder that contains it.",
            ),
            DqcError::Serialization(e) => ErrorPayload::new(
                ErrorCategory::Config,
                e.to_string(),
                "Check JSON/serialization inputs; run with --verbose for details.",
            ),
            DqcError::Metric(msg) => ErrorPayload::new(
                ErrorCategory::Metric,
                msg.to_string(),
                "Inspect metric inputs; try rerunning with --verbose.",
            ),
            DqcError::Config(msg) => {
                let lower = msg.to_ascii_lowercase();
                if lower.contains("threshold") || lower.contains("ratio") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Thresholds must be non-negative and ratios must lie within 0.0-1.0.",
                    )
                } else if lower.contains("dpi") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "DPI values must be positive (e.g., --dpi 300 or --pdf-dpi 200).",
                    )
                } else if lower.contains("directory") || lower.contains("folder") {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Pass an existing directory to --dir.",
                    )
                } else {
                    ErrorPayload::new(
                        ErrorCategory::Config,
                        msg.to_string(),
                        "Check flags/paths and the config file (TOML).",
                    )
                }
            }
            DqcError::Timeout(_) => ErrorPayload::new(
                ErrorCategory::Timeout,
                self.to_string(),
                "Increase --timeout or lower --pdf-dpi for large documents.",
            ),
        }
    }
}

impl From<InputParseError> for DqcError {
    fn from(err: InputParseError) -> Self {
        match err {
            InputParseError::UnsupportedExtension {
                extension,
                supported,
            } => DqcError::UnsupportedFormat {
                extension,
                supported,
            },
            InputParseError::FileNotFound { path } => DqcError::decode(path, "file not found"),
        }
    }
}

pub type Result<T> = std::result::Result<T, DqcError>;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ErrorCategory {
    Config,
    Io,
    Decode,
    Format,
    Metric,
    Timeout,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorPayload {
    pub category: ErrorCategory,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl ErrorPayload {
    pub fn new(category: ErrorCategory, message: String, remediation: impl Into<String>) -> Self {
        Self {
            category,
            message,
            remediation: Some(remediation.into()),
        }
    }
}
