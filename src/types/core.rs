//! Core types used throughout the DQC library.
//!
//! - [`InputKind`] - Closed classification of supported inputs
//! - [`DpiSource`] - Provenance of the density attached to a decoded page

use serde::{Deserialize, Serialize};
use std::fmt;

/// Classification of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// A single bitmap (PNG, JPEG, TIFF, BMP, WebP)
    Raster,
    /// A paged document (PDF), one report per page
    Paged,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputKind::Raster => write!(f, "raster"),
            InputKind::Paged => write!(f, "paged"),
        }
    }
}

/// Where the DPI of a decoded page came from.
///
/// Only `Declared` and `Rasterized` densities are evidence about the physical scan; an
/// `Assumed` density is a placeholder used to express sizes in inches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DpiSource {
    Declared,
    Rasterized,
    Assumed,
}

impl DpiSource {
    pub fn is_known(self) -> bool {
        !matches!(self, DpiSource::Assumed)
    }
}
