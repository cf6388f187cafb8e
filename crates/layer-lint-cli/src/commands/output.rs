//! Shared output formatting for lint results.

use anyhow::Result;
use layer_lint_core::{LintResult, Severity};
use std::io::{self, Write};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render(&mut out, result, format)?;
    out.flush()?;
    Ok(())
}

/// Writes lint results to `out`.
pub fn render(out: &mut impl Write, result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => render_text(out, result)?,
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, result)?;
            writeln!(out)?;
        }
        OutputFormat::Compact => {
            for violation in &result.violations {
                writeln!(out, "{violation}")?;
            }
        }
    }
    Ok(())
}

fn render_text(out: &mut impl Write, result: &LintResult) -> io::Result<()> {
    let (errors, warnings, infos) = result.count_by_severity();

    for violation in &result.violations {
        let severity_indicator = match violation.severity {
            Severity::Error => "\x1b[31merror\x1b[0m",
            Severity::Warning => "\x1b[33mwarning\x1b[0m",
            Severity::Info => "\x1b[34minfo\x1b[0m",
        };

        writeln!(
            out,
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        )?;
        writeln!(out, "  {}: {}", severity_indicator, violation.message)?;
        for label in &violation.labels {
            if label.location.is_unknown() {
                writeln!(out, "  = note: {}", label.message)?;
            } else {
                writeln!(
                    out,
                    "  = note: {} ({}:{}:{})",
                    label.message,
                    label.location.file.display(),
                    label.location.line,
                    label.location.column,
                )?;
            }
        }
        if let Some(suggestion) = &violation.suggestion {
            writeln!(out, "  = help: {}", suggestion.message)?;
        }
        writeln!(out)?;
    }

    for fault in &result.faults {
        writeln!(
            out,
            "\x1b[35mfault\x1b[0m rule {} failed on {}: {}",
            fault.rule, fault.symbol, fault.message
        )?;
    }
    if result.cancelled {
        writeln!(out, "\x1b[35mnote\x1b[0m: analysis was cancelled; results are partial")?;
    }

    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} info(s) in {} symbol(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.symbols_checked
    )
}
