use std::path::PathBuf;
use std::process::ExitCode;

use dqc_lib::output::{BatchEntry, BatchOutput, DQC_OUTPUT_VERSION};
use dqc_lib::{summarize, DqcError, DqcOutput, QualityStatus, Verdict};
use tracing::warn;

use crate::cli::{AnalysisArgs, OutputFormat};
use crate::formatting::{exit_code_for_verdict, render_error, write_output};
use crate::pipeline::{analyze_with_timeout, collect_batch_inputs};

use super::prepare_settings;

/// Run the batch command over every supported file in a folder.
///
/// Files are analyzed one after another; each gets the full timeout. A file
/// that cannot be analyzed becomes a failing entry instead of aborting the run.
pub async fn run_batch(
    config_path: Option<PathBuf>,
    verbose: bool,
    dir: PathBuf,
    analysis: AnalysisArgs,
    timeout: Option<u64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let settings = match prepare_settings(config_path.as_deref(), &analysis, timeout, verbose) {
        Ok(settings) => settings,
        Err(err) => return render_error(err, format, output),
    };
    let files = match collect_batch_inputs(&dir) {
        Ok(files) => files,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        eprintln!("Checking {} file(s) in {}\u{2026}", files.len(), dir.display());
    }

    let mut results = Vec::with_capacity(files.len());
    for path in files {
        let file = path.display().to_string();
        let entry = match analyze_with_timeout(
            path,
            None,
            settings.options.clone(),
            settings.timeout,
        )
        .await
        {
            Ok(report) => BatchEntry {
                verdict: summarize(&report, &settings.options.thresholds, settings.policy),
                file,
                kind: Some(report.kind),
                pages: Some(report.pages.len()),
                error: None,
            },
            Err(err) => {
                warn!(file = %file, error = %err, "file could not be analyzed");
                error_entry(file, &err)
            }
        };
        results.push(entry);
    }

    let passed = results.iter().filter(|r| r.verdict.passed()).count();
    let failed = results.len() - passed;
    let body = DqcOutput::Batch(BatchOutput {
        version: DQC_OUTPUT_VERSION.to_string(),
        directory: dir.display().to_string(),
        results,
        passed,
        failed,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DqcError::Config(err.to_string()), format, output);
    }
    exit_code_for_verdict(failed == 0)
}

fn error_entry(file: String, err: &DqcError) -> BatchEntry {
    BatchEntry {
        file,
        kind: None,
        pages: None,
        verdict: Verdict {
            status: QualityStatus::Fail,
            reason: Some(err.to_string()),
            code: None,
            page: None,
            failures: Vec::new(),
        },
        error: Some(err.to_payload()),
    }
}
