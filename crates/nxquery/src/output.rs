//! Output formatting: table or JSON.
//!
//! Frames render as one `tabled` table each; structured formats serialize
//! the data via serde.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use serde_json::Value;
use tabled::builder::Builder;
use tabled::{Table, Tabled, settings::Style};

use nxquery_core::Frame;

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Color helpers ────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// `label` in green (ok) or red (failure), if color is enabled.
pub fn status_label(label: &str, ok: bool, color: bool) -> String {
    match (color, ok) {
        (false, _) => label.to_owned(),
        (true, true) => label.green().bold().to_string(),
        (true, false) => label.red().bold().to_string(),
    }
}

/// Section heading, bold when color is enabled.
pub fn heading(text: &str, color: bool) -> String {
    if color {
        text.bold().to_string()
    } else {
        text.to_owned()
    }
}

// ── Renderers ────────────────────────────────────────────────────────

/// Render any serializable value as JSON in the chosen format.
///
/// `Table` falls back to pretty JSON for values without a table view.
pub fn render_json<T: Serialize + ?Sized>(
    format: OutputFormat,
    data: &T,
) -> Result<String, CliError> {
    Ok(match format {
        OutputFormat::JsonCompact => serde_json::to_string(data)?,
        OutputFormat::Table | OutputFormat::Json => serde_json::to_string_pretty(data)?,
    })
}

/// Render rows that derive `Tabled`.
pub fn render_rows<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render one frame as a table, header row from the field names.
pub fn render_frame(frame: &Frame) -> String {
    let mut builder = Builder::default();
    builder.push_record(frame.field_names().into_iter().map(str::to_owned));
    for row in frame.rows() {
        builder.push_record(row.iter().map(cell_text));
    }
    builder.build().with(Style::rounded()).to_string()
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}
