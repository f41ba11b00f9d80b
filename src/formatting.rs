use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dqc_lib::output::DQC_OUTPUT_VERSION;
use dqc_lib::{DqcError, DqcOutput, ErrorOutput, PageReport, Verdict};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DqcOutput,
    format: OutputFormat,
    output: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match format {
        OutputFormat::Json => write_json_output(body, output.as_deref())?,
        OutputFormat::Pretty => write_pretty_output(body, output.as_deref())?,
    };
    Ok(())
}

/// Render an error and return the appropriate exit code.
pub fn render_error(err: DqcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DqcOutput::Error(ErrorOutput {
        version: DQC_OUTPUT_VERSION.to_string(),
        message: Some(error_payload.message.clone()),
        error: error_payload,
    });

    match format {
        OutputFormat::Json => {
            let content =
                serde_json::to_string(&payload).unwrap_or_else(|_| "{\"mode\":\"error\"}".into());
            if let Some(path) = output {
                if let Err(write_err) = std::fs::write(&path, &content) {
                    eprintln!("Failed to write error output: {}", write_err);
                    println!("{content}");
                }
            } else {
                println!("{content}");
            }
        }
        OutputFormat::Pretty => {
            if let Err(write_err) = write_pretty_output(&payload, output.as_deref()) {
                eprintln!("Failed to write error output: {}", write_err);
            }
        }
    };

    // Reserve exit code 2 for fatal/errors; quality failures use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &DqcOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &DqcOutput, output: Option<&Path>) -> io::Result<()> {
    let stdout_is_tty = std::io::stdout().is_terminal();
    let use_human = output.is_none() && stdout_is_tty;

    if use_human {
        let content = format_pretty(body, true);
        println!("{content}");
        return Ok(());
    }

    // Non-tty or file output: keep JSON shape for pipelines/files.
    let content =
        serde_json::to_string_pretty(body).unwrap_or_else(|_| "{\"mode\":\"error\"}".to_string());
    if let Some(path) = output {
        std::fs::write(path, &content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Format output for human consumption in a terminal.
pub fn format_pretty(body: &DqcOutput, colorize: bool) -> String {
    match body {
        DqcOutput::Analyze(out) => {
            let mut buf = String::new();
            write_verdict_header(&mut buf, &out.verdict, &out.input.path, colorize);
            writeln!(
                buf,
                "Input: {} ({}, {} page(s))",
                out.input.path,
                out.input.kind,
                out.report.pages.len()
            )
            .ok();
            for page in &out.report.pages {
                write_page(&mut buf, page, colorize);
            }
            write_failures(&mut buf, &out.verdict);
            buf
        }
        DqcOutput::Check(out) => {
            let mut buf = String::new();
            write_verdict_header(&mut buf, &out.verdict, &out.input.path, colorize);
            write_failures(&mut buf, &out.verdict);
            buf
        }
        DqcOutput::Batch(out) => {
            let mut buf = String::new();
            let header = color("[BATCH]", "34", colorize);
            writeln!(
                buf,
                "{} {}: {} passed, {} failed",
                header, out.directory, out.passed, out.failed
            )
            .ok();
            for entry in &out.results {
                let status = status_label(&entry.verdict, colorize);
                match &entry.verdict.reason {
                    Some(reason) => writeln!(buf, "- {} {} ({})", status, entry.file, reason).ok(),
                    None => writeln!(buf, "- {} {}", status, entry.file).ok(),
                };
            }
            buf
        }
        DqcOutput::Error(out) => {
            let mut buf = String::new();
            let header = color("[ERROR]", "31", colorize);
            let message = out
                .message
                .as_deref()
                .unwrap_or_else(|| out.error.message.as_str());
            writeln!(buf, "{} {}", header, message).ok();
            if let Some(remediation) = &out.error.remediation {
                writeln!(buf, "Hint: {}", remediation).ok();
            }
            buf
        }
    }
}

fn write_verdict_header(buf: &mut String, verdict: &Verdict, path: &str, colorize: bool) {
    let status = status_label(verdict, colorize);
    let detail = match (&verdict.reason, verdict.page) {
        (Some(reason), Some(page)) => format!("{reason} (page {page})"),
        (Some(reason), None) => reason.clone(),
        _ => "document suitable for OCR".to_string(),
    };
    writeln!(buf, "{status} {path}: {detail}").ok();
}

fn write_page(buf: &mut String, page: &PageReport, colorize: bool) {
    let mark = |passed: bool| {
        if passed {
            color("ok", "32", colorize)
        } else {
            color("fail", "31", colorize)
        }
    };
    writeln!(
        buf,
        "Page {} ({}x{} px, {:.0} dpi {:?})",
        page.page,
        page.resolution.width_px,
        page.resolution.height_px,
        page.resolution.dpi,
        page.resolution.dpi_source
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} (laplacian var {:.1}, gradient median {:.1})",
        "sharpness",
        mark(page.sharpness.passed),
        page.sharpness.laplacian_variance,
        page.sharpness.gradient_median
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} ({:.2} deg)",
        "skew",
        mark(page.skew.passed),
        page.skew.angle_deg
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} (std {:.1})",
        "contrast",
        mark(page.contrast.passed),
        page.contrast.score
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} (mean {:.1})",
        "exposure",
        mark(page.exposure.passed()),
        page.exposure.mean_brightness
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} ({:.1}%)",
        "text coverage",
        mark(!page.text_coverage.too_little_text),
        page.text_coverage.ratio * 100.0
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {} ({:.1}% background)",
        "border",
        mark(!page.border.border_artifacts),
        page.border.white_ratio * 100.0
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {:.1}{}",
        "noise",
        page.noise.score,
        if page.noise.noisy { " (noisy)" } else { "" }
    )
    .ok();
    writeln!(
        buf,
        "- {:14} {}",
        "color",
        if page.color.is_color { "color" } else { "grayscale" }
    )
    .ok();
}

fn write_failures(buf: &mut String, verdict: &Verdict) {
    if verdict.failures.len() > 1 {
        writeln!(buf, "Failing pages:").ok();
        for failure in &verdict.failures {
            writeln!(buf, "- page {}: {}", failure.page, failure.reason).ok();
        }
    }
}

fn status_label(verdict: &Verdict, colorize: bool) -> String {
    if verdict.passed() {
        color("PASS", "32", colorize)
    } else {
        color("FAIL", "31", colorize)
    }
}

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Exit code for a quality verdict: 0 on pass, 1 on fail.
pub fn exit_code_for_verdict(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
