use std::fmt::Write as FmtWrite;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use dtc_lib::{DtcError, DtcOutput, ErrorOutput, Issue, MatchStatus, DTC_OUTPUT_VERSION};

use crate::cli::OutputFormat;

/// Write output in the requested format.
pub fn write_output(
    body: &DtcOutput,
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
pub fn render_error(err: DtcError, format: OutputFormat, output: Option<PathBuf>) -> ExitCode {
    let error_payload = err.to_payload();
    let payload = DtcOutput::Error(ErrorOutput {
        version: DTC_OUTPUT_VERSION.to_string(),
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

    // Reserve exit code 2 for fatal/errors; failing issues use 1.
    ExitCode::from(2)
}

/// Write JSON output to file or stdout.
fn write_json_output(body: &DtcOutput, output: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let content = serde_json::to_string(body)?;
    if let Some(path) = output {
        std::fs::write(path, content)?;
    } else {
        println!("{content}");
    }
    Ok(())
}

/// Write pretty output to file or stdout.
fn write_pretty_output(body: &DtcOutput, output: Option<&Path>) -> io::Result<()> {
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
pub fn format_pretty(body: &DtcOutput, colorize: bool) -> String {
    let format_issue = |issue: &Issue| {
        let tag = format!("[{}]", issue.status.as_str().to_uppercase());
        let tag = color(&tag, status_color_code(issue.status), colorize);
        let mut line = format!(
            "#{:<3} {} {} at ({:.0}, {:.0})",
            issue.number, tag, issue.message, issue.marker_position.x, issue.marker_position.y
        );
        if let Some(s) = &issue.suggestion {
            let target = s.handle.as_deref().unwrap_or(s.token.as_str());
            write!(line, " -> use {} ({})", target, s.value).ok();
        }
        line
    };

    match body {
        DtcOutput::Analyze(out) => {
            let mut buf = String::new();
            let status = if out.passed { "PASS" } else { "FAIL" };
            let status_colored = color(status, if out.passed { "32" } else { "31" }, colorize);
            writeln!(buf, "{} Design token check", status_colored).ok();
            writeln!(
                buf,
                "Image: {} ({}x{}), tokens: {} colors / {} typography",
                out.image.path,
                out.image.width,
                out.image.height,
                out.tokens.colors,
                out.tokens.typography
            )
            .ok();
            let s = &out.summary;
            writeln!(
                buf,
                "Matches: {} fail, {} warn, {} pass ({} colors sampled)",
                s.failures, s.warnings, s.passes, s.colors_sampled
            )
            .ok();

            if s.issues == 0 {
                writeln!(buf, "No issues found.").ok();
                return buf;
            }

            writeln!(buf, "Issues ({}):", s.issues).ok();
            for issue in &out.issues.standalone {
                writeln!(buf, "- {}", format_issue(issue)).ok();
            }
            for cluster in &out.issues.clusters {
                let header = color("Cluster", "36", colorize);
                writeln!(
                    buf,
                    "- {} at ({:.0}, {:.0}), {} issues:",
                    header,
                    cluster.position.x,
                    cluster.position.y,
                    cluster.member_issues.len()
                )
                .ok();
                for issue in &cluster.member_issues {
                    writeln!(buf, "    {}", format_issue(issue)).ok();
                }
            }
            buf
        }
        DtcOutput::Palette(out) => {
            let mut buf = String::new();
            let header = color("[PALETTE]", "34", colorize);
            writeln!(
                buf,
                "{} {} ({}x{}), {} colors",
                header,
                out.image.path,
                out.image.width,
                out.image.height,
                out.colors.len()
            )
            .ok();
            for sampled in &out.colors {
                writeln!(buf, "- {} {:>6.2}%", sampled.color, sampled.coverage_percentage).ok();
            }
            buf
        }
        DtcOutput::Error(out) => {
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

/// Apply ANSI color codes when enabled.
fn color(text: &str, code: &str, colorize: bool) -> String {
    if colorize {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Map issue status to ANSI color code.
fn status_color_code(status: MatchStatus) -> &'static str {
    match status {
        MatchStatus::Pass => "32", // green
        MatchStatus::Warn => "33", // yellow
        MatchStatus::Fail => "31", // red
    }
}

/// Determine exit code for the analyze command.
pub fn exit_code_for_analysis(passed: bool) -> ExitCode {
    if passed {
        ExitCode::SUCCESS
    } else {
        ExitCode::from(1)
    }
}
