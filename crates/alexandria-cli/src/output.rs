use std::io::Write;

use alexandria_parsing::{CitationRecord, isbn_checksum_valid};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print one parsed record as aligned `label: value` lines.
///
/// Absent fields print as `(none)`. The ISBN line notes a failed checksum.
pub fn print_record(
    w: &mut dyn Write,
    index: Option<usize>,
    citation: &str,
    record: &CitationRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    if let Some(i) = index {
        if color.enabled() {
            writeln!(w, "{}", format!("[{}]", i + 1).bold().yellow())?;
        } else {
            writeln!(w, "[{}]", i + 1)?;
        }
    }

    let raw_display: String = citation.split_whitespace().collect::<Vec<_>>().join(" ");
    let raw_display = truncate(&raw_display, 200);
    if color.enabled() {
        writeln!(w, "  {:<16} {}", "raw:", raw_display.dimmed())?;
    } else {
        writeln!(w, "  {:<16} {}", "raw:", raw_display)?;
    }

    for (name, value) in record.fields() {
        let label = format!("{name}:");
        match value {
            Some(value) if name == "isbn" && !isbn_checksum_valid(value) => {
                if color.enabled() {
                    writeln!(w, "  {:<16} {} {}", label, value, "(bad checksum)".red())?;
                } else {
                    writeln!(w, "  {:<16} {} (bad checksum)", label, value)?;
                }
            }
            Some(value) => writeln!(w, "  {:<16} {}", label, value)?,
            None => {
                if color.enabled() {
                    writeln!(w, "  {:<16} {}", label, "(none)".dimmed())?;
                } else {
                    writeln!(w, "  {:<16} (none)", label)?;
                }
            }
        }
    }
    Ok(())
}

fn truncate(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((i, _)) => format!("{}...", &text[..i]),
        None => text.to_string(),
    }
}
