use std::path::PathBuf;
use std::process::ExitCode;

use dqc_lib::output::{AnalyzeOutput, InputDescriptor, DQC_OUTPUT_VERSION};
use dqc_lib::{summarize, DqcError, DqcOutput};

use crate::cli::{AnalysisArgs, InputType, OutputFormat};
use crate::formatting::{exit_code_for_verdict, render_error, write_output};
use crate::pipeline::analyze_with_timeout;

use super::prepare_settings;

/// Run the analyze command: full report plus verdict.
#[allow(clippy::too_many_arguments)]
pub async fn run_analyze(
    config_path: Option<PathBuf>,
    verbose: bool,
    input: PathBuf,
    input_type: Option<InputType>,
    analysis: AnalysisArgs,
    timeout: Option<u64>,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> ExitCode {
    let settings = match prepare_settings(config_path.as_deref(), &analysis, timeout, verbose) {
        Ok(settings) => settings,
        Err(err) => return render_error(err, format, output),
    };
    if verbose {
        eprintln!("Analyzing {}\u{2026}", input.display());
    }

    let report = match analyze_with_timeout(
        input,
        input_type.map(Into::into),
        settings.options.clone(),
        settings.timeout,
    )
    .await
    {
        Ok(report) => report,
        Err(err) => return render_error(err, format, output),
    };

    let verdict = summarize(&report, &settings.options.thresholds, settings.policy);
    let passed = verdict.passed();
    let body = DqcOutput::Analyze(AnalyzeOutput {
        version: DQC_OUTPUT_VERSION.to_string(),
        input: InputDescriptor {
            kind: report.kind,
            path: report.file.clone(),
        },
        report,
        verdict,
    });
    if let Err(err) = write_output(&body, format, output.clone()) {
        return render_error(DqcError::Config(err.to_string()), format, output);
    }
    exit_code_for_verdict(passed)
}
