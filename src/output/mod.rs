//! Output formatting for scan reports

use crate::scanner::ScanReport;
use crate::ScanError;
use colored::*;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format '{}'", other)),
        }
    }
}

/// Render a finished report in the requested format
pub fn render(report: &ScanReport, format: OutputFormat) -> crate::Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(report)),
        OutputFormat::Json => render_json(report),
    }
}

/// Duration and rate line followed by the open ports in discovery order
pub fn render_text(report: &ScanReport) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "\n{} {:.2} seconds ({:.1} ports/s)",
        "Scan completed in".bright_blue(),
        report.duration.as_secs_f64(),
        report.scan_rate()
    );

    let open = if report.open_ports.is_empty() {
        "none".to_string()
    } else {
        report
            .open_ports
            .iter()
            .map(u16::to_string)
            .collect::<Vec<_>>()
            .join(", ")
    };
    let _ = writeln!(out, "{} {}", "Open ports:".bright_green().bold(), open);

    if report.stats.timeouts > 0 || report.stats.errors > 0 {
        let _ = writeln!(
            out,
            "{} {} timed out, {} failed",
            "Not open:".bright_yellow(),
            report.stats.timeouts,
            report.stats.errors
        );
    }

    out
}

pub fn render_json(report: &ScanReport) -> crate::Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| ScanError::OutputError(e.to_string()))
}
