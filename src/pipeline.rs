use std::path::{Path, PathBuf};
use std::time::Duration;

use dqc_lib::input::{kind_for_extension, supported_extensions};
use dqc_lib::{analyze_file, AnalysisOptions, DqcError, FileReport, InputKind};
use tracing::{debug, warn};

/// Analyze a file on the blocking pool, giving up after `timeout`.
///
/// The analysis itself cannot be cancelled; on expiry the worker is left to
/// finish in the background and its result is discarded.
pub async fn analyze_with_timeout(
    path: PathBuf,
    declared: Option<InputKind>,
    options: AnalysisOptions,
    timeout: Duration,
) -> Result<FileReport, DqcError> {
    let task = tokio::task::spawn_blocking(move || analyze_file(&path, declared, &options));
    match tokio::time::timeout(timeout, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_err)) => Err(DqcError::metric(format!(
            "analysis worker failed: {join_err}"
        ))),
        Err(_) => {
            warn!(timeout_secs = timeout.as_secs(), "analysis timed out");
            Err(DqcError::Timeout(timeout))
        }
    }
}

/// Supported files directly inside `dir`, sorted by path.
pub fn collect_batch_inputs(dir: &Path) -> Result<Vec<PathBuf>, DqcError> {
    if !dir.is_dir() {
        return Err(DqcError::Config(format!(
            "Batch directory not found: {}",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if !path.is_file() {
            continue;
        }
        let supported = path
            .extension()
            .and_then(|e| e.to_str())
            .and_then(kind_for_extension)
            .is_some();
        if supported {
            files.push(path);
        } else {
            debug!(path = %path.display(), supported = %supported_extensions(), "skipping unsupported file");
        }
    }
    files.sort();
    Ok(files)
}
